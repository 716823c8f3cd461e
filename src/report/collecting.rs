//! In-memory reporter that records every event.

use std::sync::Mutex;

use super::{ReportEvent, Reporter, Severity};

/// Records report events in the order they were emitted.
///
/// # Example
///
/// ```
/// use node_validator::report::{CollectingReporter, Reporter, Severity};
///
/// let reporter = CollectingReporter::new();
/// reporter.report("CGROUPS_CPU", "enabled", Severity::Good);
///
/// assert_eq!(reporter.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Removes and returns all recorded events.
    pub fn take(&self) -> Vec<ReportEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, item: &str, message: &str, severity: Severity) {
        let event = ReportEvent::new(item, message, severity);
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

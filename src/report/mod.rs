//! Reporting sinks for per-item validation results.
//!
//! Validators emit one event per checked item (for example one per declared
//! cgroup subsystem) through a [`Reporter`]. The aggregated warnings and
//! errors are returned separately; reporting is a side channel for detailed
//! diagnostics.

mod collecting;
mod stream;

pub use collecting::CollectingReporter;
pub use stream::StreamReporter;

use serde::Serialize;

/// How a single reported item should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Item satisfies the spec.
    Good,
    /// Item is missing but only advisory.
    Warn,
    /// Item is missing and required.
    Bad,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Warn => write!(f, "warn"),
            Self::Bad => write!(f, "bad"),
        }
    }
}

/// One reported item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEvent {
    /// Stable, upper-cased item key, e.g. `CGROUPS_MEMORY`.
    pub item: String,
    /// Short status, e.g. `enabled` or `missing`.
    pub message: String,
    /// Presentation severity.
    pub severity: Severity,
}

impl ReportEvent {
    /// Creates a new report event.
    #[must_use]
    pub fn new(item: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            item: item.into(),
            message: message.into(),
            severity,
        }
    }
}

/// A sink for per-item validation results.
///
/// Takes `&self` so one sink can be shared by every validator in a run.
pub trait Reporter {
    /// Records the outcome of a single item.
    fn report(&self, item: &str, message: &str, severity: Severity);
}

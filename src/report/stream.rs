//! Line-oriented reporter writing to any `io::Write`.

use std::io::Write;
use std::sync::Mutex;

use tracing::warn;

use super::{Reporter, Severity};

/// Writes one `ITEM: message` line per event.
///
/// Write failures are logged and otherwise ignored; a broken output stream
/// never changes the validation result.
#[derive(Debug)]
pub struct StreamReporter<W: Write> {
    out: Mutex<W>,
}

impl StreamReporter<std::io::Stdout> {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> StreamReporter<W> {
    /// Creates a reporter writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the reporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write> Reporter for StreamReporter<W> {
    fn report(&self, item: &str, message: &str, severity: Severity) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(out, "{item}: {message}") {
            warn!(item, %severity, error = %e, "failed to write report line");
        }
    }
}

//! Operating system validation.

use tracing::info;

use super::{ValidationOutcome, Validator, uname};
use crate::error::ValidationError;
use crate::report::{Reporter, Severity};
use crate::spec::SysSpec;

/// Report item key for the operating system.
pub const OS_ITEM: &str = "OS";

/// Validates that `uname -s` matches `spec.os`.
pub struct OsValidator<'r> {
    reporter: &'r dyn Reporter,
    sysname: Option<String>,
}

impl std::fmt::Debug for OsValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsValidator")
            .field("sysname", &self.sysname)
            .finish_non_exhaustive()
    }
}

impl<'r> OsValidator<'r> {
    /// Creates a validator that reads the OS name from `uname`.
    #[must_use]
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            reporter,
            sysname: None,
        }
    }

    /// Creates a validator that checks a fixed OS name.
    #[must_use]
    pub fn with_sysname(reporter: &'r dyn Reporter, sysname: impl Into<String>) -> Self {
        Self {
            reporter,
            sysname: Some(sysname.into()),
        }
    }
}

impl Validator for OsValidator<'_> {
    fn name(&self) -> &'static str {
        "os"
    }

    fn validate(&self, spec: &SysSpec) -> ValidationOutcome {
        info!("Checking operating system");

        let sysname = match &self.sysname {
            Some(sysname) => sysname.clone(),
            None => match uname() {
                Ok(uts) => uts.sysname().to_string_lossy().to_string(),
                Err(e) => return ValidationOutcome::error(e),
            },
        };

        if sysname != spec.os {
            self.reporter.report(OS_ITEM, &sysname, Severity::Bad);
            return ValidationOutcome::error(ValidationError::UnsupportedOs {
                found: sysname,
                expected: spec.os.clone(),
            });
        }

        self.reporter.report(OS_ITEM, &sysname, Severity::Good);
        ValidationOutcome::default()
    }
}

//! Kernel version validation.

use tracing::{debug, info};

use super::{ValidationOutcome, Validator, uname};
use crate::error::ValidationError;
use crate::report::{Reporter, Severity};
use crate::spec::SysSpec;

/// Report item key for the kernel version.
pub const KERNEL_VERSION_ITEM: &str = "KERNEL_VERSION";

/// Validates the running kernel against `spec.kernel.min_version`.
pub struct KernelValidator<'r> {
    reporter: &'r dyn Reporter,
    release: Option<String>,
}

impl std::fmt::Debug for KernelValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelValidator")
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}

impl<'r> KernelValidator<'r> {
    /// Creates a validator that reads the release from `uname`.
    #[must_use]
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            reporter,
            release: None,
        }
    }

    /// Creates a validator that checks a fixed release string.
    #[must_use]
    pub fn with_release(reporter: &'r dyn Reporter, release: impl Into<String>) -> Self {
        Self {
            reporter,
            release: Some(release.into()),
        }
    }

    fn release(&self) -> Result<String, ValidationError> {
        match &self.release {
            Some(release) => Ok(release.clone()),
            None => uname().map(|uts| uts.release().to_string_lossy().to_string()),
        }
    }
}

impl Validator for KernelValidator<'_> {
    fn name(&self) -> &'static str {
        "kernel"
    }

    fn validate(&self, spec: &SysSpec) -> ValidationOutcome {
        info!("Checking kernel version");

        let required = match spec.kernel.min_version() {
            Ok(required) => required,
            Err(_) => {
                return ValidationOutcome::error(ValidationError::InvalidKernelRequirement {
                    found: spec.kernel.min_version.clone(),
                });
            }
        };

        let release = match self.release() {
            Ok(release) => release,
            Err(e) => return ValidationOutcome::error(e),
        };

        let Some(found) = parse_kernel_version(&release) else {
            self.reporter
                .report(KERNEL_VERSION_ITEM, &release, Severity::Bad);
            return ValidationOutcome::error(ValidationError::KernelVersionUnparsable {
                found: release,
            });
        };
        debug!(?found, ?required, "kernel version");

        if found < required {
            self.reporter
                .report(KERNEL_VERSION_ITEM, &release, Severity::Bad);
            return ValidationOutcome::error(ValidationError::KernelTooOld {
                found: release,
                required: spec.kernel.min_version.clone(),
            });
        }

        self.reporter
            .report(KERNEL_VERSION_ITEM, &release, Severity::Good);
        ValidationOutcome::default()
    }
}

/// Parses a kernel version string into `(major, minor)`.
///
/// Anything after the minor number is ignored, so `6.8.0-generic` and
/// `5.15` both parse. Returns `None` if either number is missing.
#[must_use]
pub fn parse_kernel_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');

    let major = parts.next()?.parse::<u32>().ok()?;

    // Minor version might have suffix like "7-generic", extract just the number
    let minor = parts
        .next()?
        .split(|c: char| !c.is_ascii_digit())
        .next()?
        .parse::<u32>()
        .ok()?;

    Some((major, minor))
}

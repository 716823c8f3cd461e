//! Common validator contract and the runner that aggregates results.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::{CgroupsValidator, KernelValidator, OsValidator};
use crate::error::ValidationError;
use crate::report::Reporter;
use crate::spec::SysSpec;

/// Warnings and errors produced by one validator run.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    /// Advisory findings.
    pub warnings: Vec<ValidationError>,
    /// Findings that fail validation.
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    /// An outcome holding a single error and no warnings.
    #[must_use]
    pub fn error(error: ValidationError) -> Self {
        Self {
            warnings: Vec::new(),
            errors: vec![error],
        }
    }

    /// Returns true if there are neither warnings nor errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// A single host check.
pub trait Validator {
    /// Short, stable validator name, e.g. `cgroups`.
    fn name(&self) -> &'static str;

    /// Checks the host against `spec`.
    fn validate(&self, spec: &SysSpec) -> ValidationOutcome;
}

/// The closed set of validators shipped with this crate.
#[derive(Debug)]
pub enum SystemValidator<'r> {
    /// Operating system name.
    Os(OsValidator<'r>),
    /// Kernel version.
    Kernel(KernelValidator<'r>),
    /// Cgroup subsystems.
    Cgroups(CgroupsValidator<'r>),
}

impl<'r> SystemValidator<'r> {
    /// Names accepted by [`SystemValidator::by_name`], in run order.
    pub const NAMES: [&'static str; 3] = ["os", "kernel", "cgroups"];

    /// All validators reading the live host, in run order.
    #[must_use]
    pub fn defaults(reporter: &'r dyn Reporter) -> Vec<Self> {
        vec![
            Self::Os(OsValidator::new(reporter)),
            Self::Kernel(KernelValidator::new(reporter)),
            Self::Cgroups(CgroupsValidator::new(reporter)),
        ]
    }

    /// Builds the validator with the given name, reading `proc_cgroups`
    /// for the cgroups check. Returns `None` for an unknown name.
    #[must_use]
    pub fn by_name(
        name: &str,
        reporter: &'r dyn Reporter,
        proc_cgroups: impl Into<PathBuf>,
    ) -> Option<Self> {
        match name {
            "os" => Some(Self::Os(OsValidator::new(reporter))),
            "kernel" => Some(Self::Kernel(KernelValidator::new(reporter))),
            "cgroups" => Some(Self::Cgroups(CgroupsValidator::with_path(
                reporter,
                proc_cgroups,
            ))),
            _ => None,
        }
    }

    /// Builds the named validators in first-seen order.
    ///
    /// Repeated names yield a single validator; unknown names are skipped.
    #[must_use]
    pub fn select<'n>(
        names: impl IntoIterator<Item = &'n str>,
        reporter: &'r dyn Reporter,
        proc_cgroups: &Path,
    ) -> Vec<Self> {
        let mut seen = Vec::new();
        let mut validators = Vec::new();

        for name in names {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);

            if let Some(validator) = Self::by_name(name, reporter, proc_cgroups) {
                validators.push(validator);
            }
        }

        validators
    }
}

impl Validator for SystemValidator<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Os(v) => v.name(),
            Self::Kernel(v) => v.name(),
            Self::Cgroups(v) => v.name(),
        }
    }

    fn validate(&self, spec: &SysSpec) -> ValidationOutcome {
        match self {
            Self::Os(v) => v.validate(spec),
            Self::Kernel(v) => v.validate(spec),
            Self::Cgroups(v) => v.validate(spec),
        }
    }
}

/// A finding tagged with the validator that produced it.
#[derive(Debug)]
pub struct Finding {
    /// Name of the validator.
    pub validator: &'static str,
    /// The finding itself.
    pub error: ValidationError,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.validator, self.error)
    }
}

/// Results of running several validators.
#[derive(Debug, Default)]
pub struct ValidationSummary {
    /// Advisory findings from every validator, in run order.
    pub warnings: Vec<Finding>,
    /// Failing findings from every validator, in run order.
    pub errors: Vec<Finding>,
}

impl ValidationSummary {
    /// Returns true if any validator produced an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs each validator in order and collects all findings.
///
/// A failing validator does not stop the ones after it.
pub fn validate_all<V: Validator>(validators: &[V], spec: &SysSpec) -> ValidationSummary {
    let mut summary = ValidationSummary::default();

    for validator in validators {
        let name = validator.name();
        let outcome = validator.validate(spec);

        for warning in outcome.warnings {
            warn!(validator = name, "{warning}");
            summary.warnings.push(Finding {
                validator: name,
                error: warning,
            });
        }

        for err in outcome.errors {
            error!(validator = name, "{err}");
            summary.errors.push(Finding {
                validator: name,
                error: err,
            });
        }
    }

    info!(
        errors = summary.errors.len(),
        warnings = summary.warnings.len(),
        "Host validation complete"
    );
    summary
}

//! Error types for the node validator.
//!
//! Uses thiserror for deriving std::error::Error and miette for rich diagnostics.

#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the application.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The system specification could not be loaded
    #[error("Failed to load system specification")]
    #[diagnostic(code(nv::spec))]
    Spec(#[from] SpecError),

    /// One or more validators reported errors
    #[error("Host validation failed with {errors} error(s) and {warnings} warning(s)")]
    #[diagnostic(
        code(nv::validation_failed),
        help("Fix the errors listed above, or pass a spec that matches this host")
    )]
    ValidationFailed { errors: usize, warnings: usize },
}

/// Findings produced by a single validator.
///
/// These are the elements of the warning and error lists a validator
/// returns; whether a finding is a warning or an error is decided by the
/// list it is placed in, not by the variant.
#[derive(Error, Debug, Diagnostic)]
pub enum ValidationError {
    /// The kernel cgroup status source could not be opened or read
    #[error("failed to get cgroup subsystems: {source}")]
    #[diagnostic(
        code(nv::cgroups::read_failed),
        help("Check that /proc is mounted and /proc/cgroups is readable")
    )]
    CgroupSubsystems {
        #[source]
        source: std::io::Error,
    },

    /// Required cgroup subsystems are not enabled
    #[error("missing required cgroups: {}", .names.join(" "))]
    #[diagnostic(
        code(nv::cgroups::missing_required),
        help("Enable the listed controllers on the kernel command line or in the kernel config")
    )]
    MissingRequiredCgroups { names: Vec<String> },

    /// Optional cgroup subsystems are not enabled
    #[error("missing optional cgroups: {}", .names.join(" "))]
    #[diagnostic(code(nv::cgroups::missing_optional))]
    MissingOptionalCgroups { names: Vec<String> },

    /// Kernel version too old
    #[error("Kernel version {found} is below minimum required {required}")]
    #[diagnostic(
        code(nv::kernel::version),
        help("Upgrade the kernel or lower kernel.min_version in the spec")
    )]
    KernelTooOld { found: String, required: String },

    /// Kernel release string does not start with major.minor
    #[error("Kernel release {found} is not in major.minor form")]
    #[diagnostic(code(nv::kernel::unparsable))]
    KernelVersionUnparsable { found: String },

    /// Spec minimum kernel version is not usable
    #[error("Minimum kernel version {found:?} is not in major.minor form")]
    #[diagnostic(code(nv::kernel::invalid_requirement))]
    InvalidKernelRequirement { found: String },

    /// Operating system does not match the spec
    #[error("Operating system {found} is not supported, expected {expected}")]
    #[diagnostic(code(nv::os::unsupported))]
    UnsupportedOs { found: String, expected: String },

    /// Failed to read system information
    #[error("Failed to read system information: {context}")]
    #[diagnostic(code(nv::system::read_failed))]
    ReadFailed {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to loading a system specification.
#[derive(Error, Debug, Diagnostic)]
pub enum SpecError {
    /// Spec file could not be read
    #[error("Failed to read spec file {}", .path.display())]
    #[diagnostic(code(nv::spec::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spec file is not valid JSON for a `SysSpec`
    #[error("Failed to parse spec file {}: {reason}", .path.display())]
    #[diagnostic(
        code(nv::spec::parse),
        help("Expected a JSON object with optional \"os\", \"kernel\" and \"cgroups\" sections")
    )]
    Parse { path: PathBuf, reason: String },

    /// Spec parsed but holds an unusable value
    #[error("Invalid system specification: {reason}")]
    #[diagnostic(code(nv::spec::invalid))]
    Invalid { reason: String },
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_message_is_space_joined() {
        let err = ValidationError::MissingRequiredCgroups {
            names: vec!["memory".to_string(), "pids".to_string()],
        };
        assert_eq!(err.to_string(), "missing required cgroups: memory pids");
    }

    #[test]
    fn test_spec_error_converts_to_top_level() {
        let err = Error::from(SpecError::Invalid {
            reason: "bad".to_string(),
        });
        assert!(matches!(err, Error::Spec(SpecError::Invalid { .. })));
        assert_eq!(err.to_string(), "Failed to load system specification");
    }

    #[test]
    fn test_validation_failed_counts() {
        let err = Error::ValidationFailed {
            errors: 2,
            warnings: 1,
        };
        assert_eq!(
            err.to_string(),
            "Host validation failed with 2 error(s) and 1 warning(s)"
        );
    }

    #[test]
    fn test_read_failure_wraps_underlying_error() {
        let err = ValidationError::CgroupSubsystems {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "failed to get cgroup subsystems: no such file"
        );
    }
}

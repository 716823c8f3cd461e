//! System specification describing what a host must provide.
//!
//! A `SysSpec` is normally the embedded Linux default, or loaded from a
//! JSON file:
//!
//! ```
//! use node_validator::spec::SysSpec;
//!
//! let spec: SysSpec = serde_json::from_str(
//!     r#"{ "cgroups": { "required": ["cpu", "memory"], "optional": ["pids"] } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(spec.os, "Linux");
//! assert_eq!(spec.cgroups.required, vec!["cpu", "memory"]);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Operating system name expected by the default spec.
pub const DEFAULT_OS: &str = "Linux";

/// Minimum kernel version expected by the default spec.
pub const DEFAULT_MIN_KERNEL_VERSION: &str = "3.10";

/// Cgroup subsystems a workload agent cannot run without.
pub const DEFAULT_REQUIRED_CGROUPS: &[&str] = &[
    "cpu", "cpuacct", "cpuset", "devices", "freezer", "memory", "pids",
];

/// Cgroup subsystems that enable extra features when present.
pub const DEFAULT_OPTIONAL_CGROUPS: &[&str] = &["hugetlb", "blkio"];

/// The full specification a host is validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SysSpec {
    /// Expected operating system name, as reported by `uname -s`.
    pub os: String,

    /// Kernel requirements.
    pub kernel: KernelSpec,

    /// Cgroup subsystem requirements.
    pub cgroups: CgroupSpec,
}

impl Default for SysSpec {
    fn default() -> Self {
        Self {
            os: DEFAULT_OS.to_string(),
            kernel: KernelSpec::default(),
            cgroups: CgroupSpec::default(),
        }
    }
}

impl SysSpec {
    /// Loads a spec from a JSON file.
    ///
    /// Sections missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Read` if the file cannot be read,
    /// `SpecError::Parse` if the JSON is malformed, or
    /// `SpecError::Invalid` if the kernel minimum version is unusable.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let content = fs::read_to_string(path).map_err(|e| SpecError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let spec: Self = serde_json::from_str(&content).map_err(|e| SpecError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        spec.kernel.min_version()?;
        Ok(spec)
    }
}

/// Kernel requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelSpec {
    /// Lowest acceptable kernel version, in `major.minor` form.
    pub min_version: String,
}

impl Default for KernelSpec {
    fn default() -> Self {
        Self {
            min_version: DEFAULT_MIN_KERNEL_VERSION.to_string(),
        }
    }
}

impl KernelSpec {
    /// Returns the minimum version as `(major, minor)`.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Invalid` if `min_version` is not `major.minor`.
    pub fn min_version(&self) -> Result<(u32, u32), SpecError> {
        crate::system::parse_kernel_version(&self.min_version).ok_or_else(|| {
            SpecError::Invalid {
                reason: format!(
                    "kernel.min_version {:?} is not in major.minor form",
                    self.min_version
                ),
            }
        })
    }
}

/// Cgroup subsystems the host must (required) or should (optional) enable.
///
/// List order is kept through reporting so output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CgroupSpec {
    /// Missing entries are errors.
    pub required: Vec<String>,

    /// Missing entries are warnings.
    pub optional: Vec<String>,
}

impl Default for CgroupSpec {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED_CGROUPS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            optional: DEFAULT_OPTIONAL_CGROUPS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl CgroupSpec {
    /// Creates a cgroup spec from required and optional name lists.
    #[must_use]
    pub fn new<R, O>(required: R, optional: O) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    /// A spec with no cgroup requirements at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            required: Vec::new(),
            optional: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_spec() {
        let spec = SysSpec::default();
        assert_eq!(spec.os, "Linux");
        assert_eq!(spec.kernel.min_version, "3.10");
        assert_eq!(spec.cgroups.required.len(), 7);
        assert!(spec.cgroups.required.iter().any(|c| c == "memory"));
        assert_eq!(spec.cgroups.optional, vec!["hugetlb", "blkio"]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let spec: SysSpec = serde_json::from_str(r#"{ "os": "Linux" }"#).expect("should parse");
        assert_eq!(spec, SysSpec::default());
    }

    #[test]
    fn test_partial_cgroup_section() {
        let spec: SysSpec =
            serde_json::from_str(r#"{ "cgroups": { "required": ["cpu"] } }"#).expect("should parse");
        assert_eq!(spec.cgroups.required, vec!["cpu"]);
        assert_eq!(spec.cgroups.optional, vec!["hugetlb", "blkio"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SysSpec, _> = serde_json::from_str(r#"{ "cgroup": {} }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kernel_min_version() {
        let kernel = KernelSpec {
            min_version: "5.15".to_string(),
        };
        assert_eq!(kernel.min_version().expect("should parse"), (5, 15));

        let bad = KernelSpec {
            min_version: "five".to_string(),
        };
        assert!(bad.min_version().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("spec.json");
        fs::write(
            &path,
            r#"{ "kernel": { "min_version": "6.1" }, "cgroups": { "required": ["pids"], "optional": [] } }"#,
        )
        .expect("failed to write spec");

        let spec = SysSpec::load(&path).expect("should load");
        assert_eq!(spec.kernel.min_version, "6.1");
        assert_eq!(spec.cgroups, CgroupSpec::new(["pids"], Vec::<String>::new()));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let err = SysSpec::load(&temp_dir.path().join("absent.json")).expect_err("should fail");
        assert!(matches!(err, SpecError::Read { .. }));
    }

    #[test]
    fn test_load_rejects_bad_kernel_version() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("spec.json");
        fs::write(&path, r#"{ "kernel": { "min_version": "latest" } }"#)
            .expect("failed to write spec");

        let err = SysSpec::load(&path).expect_err("should fail");
        assert!(matches!(err, SpecError::Invalid { .. }));
    }
}

//! Cgroup subsystem validation.
//!
//! Reads the kernel's list of cgroup subsystems from `/proc/cgroups` and
//! checks the required and optional names from the spec against it.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{ValidationOutcome, Validator};
use crate::error::ValidationError;
use crate::report::{Reporter, Severity};
use crate::spec::SysSpec;

/// Kernel status file listing every cgroup subsystem.
pub const PROC_CGROUPS_PATH: &str = "/proc/cgroups";

/// Prefix for cgroup report item keys.
pub const CGROUPS_ITEM_PREFIX: &str = "CGROUPS_";

/// Validates that the cgroup subsystems named in the spec are enabled.
pub struct CgroupsValidator<'r> {
    reporter: &'r dyn Reporter,
    proc_cgroups: PathBuf,
}

impl std::fmt::Debug for CgroupsValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CgroupsValidator")
            .field("proc_cgroups", &self.proc_cgroups)
            .finish_non_exhaustive()
    }
}

impl<'r> CgroupsValidator<'r> {
    /// Creates a validator reading the well-known `/proc/cgroups`.
    #[must_use]
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self::with_path(reporter, PROC_CGROUPS_PATH)
    }

    /// Creates a validator reading the subsystem list from `path`.
    #[must_use]
    pub fn with_path(reporter: &'r dyn Reporter, path: impl Into<PathBuf>) -> Self {
        Self {
            reporter,
            proc_cgroups: path.into(),
        }
    }

    /// Path the subsystem list is read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.proc_cgroups
    }

    /// Reports each declared name and returns the ones not enabled.
    fn check_subsystems(
        &self,
        declared: &[String],
        enabled: &[String],
        required: bool,
    ) -> Vec<String> {
        let mut missing = Vec::new();

        for name in declared {
            let item = item_key(name);

            if enabled.iter().any(|subsystem| subsystem == name) {
                debug!(cgroup = %name, "cgroup subsystem enabled");
                self.reporter.report(&item, "enabled", Severity::Good);
                continue;
            }

            let severity = if required {
                Severity::Bad
            } else {
                Severity::Warn
            };
            debug!(cgroup = %name, required, "cgroup subsystem missing");
            self.reporter.report(&item, "missing", severity);
            missing.push(name.clone());
        }

        missing
    }
}

impl Validator for CgroupsValidator<'_> {
    fn name(&self) -> &'static str {
        "cgroups"
    }

    fn validate(&self, spec: &SysSpec) -> ValidationOutcome {
        info!(path = %self.proc_cgroups.display(), "Checking cgroup subsystems");

        let enabled = match read_enabled_subsystems(&self.proc_cgroups) {
            Ok(enabled) => enabled,
            Err(source) => {
                return ValidationOutcome::error(ValidationError::CgroupSubsystems { source });
            }
        };
        debug!(?enabled, "enabled cgroup subsystems");

        let mut outcome = ValidationOutcome::default();

        let missing_required = self.check_subsystems(&spec.cgroups.required, &enabled, true);
        if !missing_required.is_empty() {
            outcome.errors.push(ValidationError::MissingRequiredCgroups {
                names: missing_required,
            });
        }

        let missing_optional = self.check_subsystems(&spec.cgroups.optional, &enabled, false);
        if !missing_optional.is_empty() {
            outcome.warnings.push(ValidationError::MissingOptionalCgroups {
                names: missing_optional,
            });
        }

        outcome
    }
}

/// Report item key for a subsystem name, e.g. `memory` -> `CGROUPS_MEMORY`.
#[must_use]
pub fn item_key(name: &str) -> String {
    format!("{CGROUPS_ITEM_PREFIX}{}", name.to_uppercase())
}

/// Reads the names of all enabled cgroup subsystems from `path`.
///
/// The file is re-read on every call.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be opened or a read fails.
pub fn read_enabled_subsystems(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    parse_enabled_subsystems(BufReader::new(file))
}

/// Parses `/proc/cgroups` content into the names of enabled subsystems.
///
/// Each record is `subsys_name hierarchy num_cgroups enabled`. Lines
/// starting with `#` are skipped, as are lines with fewer than four fields.
/// A subsystem counts as enabled unless its fourth field is literally `0`;
/// the field is compared as text, not parsed. Invalid UTF-8 is tolerated.
///
/// # Errors
///
/// Returns the I/O error if reading from `reader` fails.
pub fn parse_enabled_subsystems<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut subsystems = Vec::new();

    for line in reader.split(b'\n') {
        let line = line?;
        if line.first() == Some(&b'#') {
            continue;
        }

        let line = String::from_utf8_lossy(&line);
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() >= 4 && fields[3] != "0" {
            subsystems.push(fields[0].to_string());
        }
    }

    Ok(subsystems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CollectingReporter, ReportEvent};
    use crate::spec::CgroupSpec;
    use std::fs;
    use tempfile::TempDir;

    const PROC_CGROUPS: &str = "\
#subsys_name\thierarchy\tnum_cgroups\tenabled
cpuset\t2\t4\t1
cpu\t3\t64\t1
cpuacct\t3\t64\t1
memory\t0\t1\t0
pids\t4\t70\t1
";

    fn spec_with(required: &[&str], optional: &[&str]) -> SysSpec {
        SysSpec {
            cgroups: CgroupSpec::new(required.iter().copied(), optional.iter().copied()),
            ..SysSpec::default()
        }
    }

    fn write_proc_cgroups(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("cgroups");
        fs::write(&path, content).expect("failed to write fixture");
        path
    }

    #[test]
    fn test_parse_skips_comments_and_disabled() {
        let enabled = parse_enabled_subsystems(PROC_CGROUPS.as_bytes()).expect("should parse");
        assert_eq!(enabled, vec!["cpuset", "cpu", "cpuacct", "pids"]);
    }

    #[test]
    fn test_parse_skips_short_and_blank_lines() {
        let content = "\ncpu 1 1\n   \nmemory 2 1 1\n\t\n";
        let enabled = parse_enabled_subsystems(content.as_bytes()).expect("should parse");
        assert_eq!(enabled, vec!["memory"]);
    }

    #[test]
    fn test_parse_compares_field_as_text() {
        let content = "cpu 1 1 00\nmemory 2 1 0\npids 3 1 n/a\n";
        let enabled = parse_enabled_subsystems(content.as_bytes()).expect("should parse");
        assert_eq!(enabled, vec!["cpu", "pids"]);
    }

    #[test]
    fn test_parse_tolerates_invalid_utf8() {
        let content: &[u8] = b"#subsys \xff\xfe header\ncpu 1 1 1\nmemory 2 1 1\n";
        let enabled = parse_enabled_subsystems(content).expect("should parse");
        assert_eq!(enabled, vec!["cpu", "memory"]);
    }

    #[test]
    fn test_parse_handles_crlf_and_missing_final_newline() {
        let content = "cpu 1 1 1\r\nmemory 2 1 0\r\npids 3 1 1";
        let enabled = parse_enabled_subsystems(content.as_bytes()).expect("should parse");
        assert_eq!(enabled, vec!["cpu", "pids"]);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let content = "misc 5 1 1 extra\n";
        let enabled = parse_enabled_subsystems(content.as_bytes()).expect("should parse");
        assert_eq!(enabled, vec!["misc"]);
    }

    #[test]
    fn test_item_key_is_uppercased() {
        assert_eq!(item_key("memory"), "CGROUPS_MEMORY");
        assert_eq!(item_key("Hugetlb"), "CGROUPS_HUGETLB");
    }

    #[test]
    fn test_validate_reports_each_declared_name() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = write_proc_cgroups(&temp_dir, PROC_CGROUPS);
        let reporter = CollectingReporter::new();
        let validator = CgroupsValidator::with_path(&reporter, path);

        let outcome = validator.validate(&spec_with(&["cpu", "memory"], &["pids", "blkio"]));

        assert_eq!(
            reporter.events(),
            vec![
                ReportEvent::new("CGROUPS_CPU", "enabled", Severity::Good),
                ReportEvent::new("CGROUPS_MEMORY", "missing", Severity::Bad),
                ReportEvent::new("CGROUPS_PIDS", "enabled", Severity::Good),
                ReportEvent::new("CGROUPS_BLKIO", "missing", Severity::Warn),
            ]
        );
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_missing_optional_never_becomes_error() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = write_proc_cgroups(&temp_dir, PROC_CGROUPS);
        let reporter = CollectingReporter::new();
        let validator = CgroupsValidator::with_path(&reporter, path);

        let outcome = validator.validate(&spec_with(&[], &["memory", "hugetlb"]));

        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.warnings[0].to_string(),
            "missing optional cgroups: memory hugetlb"
        );
    }

    #[test]
    fn test_unreadable_source_emits_no_events() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let reporter = CollectingReporter::new();
        let validator = CgroupsValidator::with_path(&reporter, temp_dir.path().join("absent"));

        let outcome = validator.validate(&spec_with(&["cpu"], &["pids"]));

        assert!(reporter.events().is_empty());
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0],
            ValidationError::CgroupSubsystems { .. }
        ));
    }

    #[test]
    fn test_default_path() {
        let reporter = CollectingReporter::new();
        let validator = CgroupsValidator::new(&reporter);
        assert_eq!(validator.path(), Path::new("/proc/cgroups"));
        assert_eq!(validator.name(), "cgroups");
    }
}

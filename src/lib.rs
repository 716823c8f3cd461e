//! Node Validator - host preflight checks for workload agents.
//!
//! This crate validates that a host's operating system, kernel and cgroup
//! subsystems satisfy a declared [`SysSpec`](spec::SysSpec) before an agent
//! starts on it.
//!
//! # Example
//!
//! ```no_run
//! use node_validator::report::StreamReporter;
//! use node_validator::spec::SysSpec;
//! use node_validator::system::{SystemValidator, validate_all};
//!
//! let reporter = StreamReporter::stdout();
//! let validators = SystemValidator::defaults(&reporter);
//!
//! let summary = validate_all(&validators, &SysSpec::default());
//! for finding in &summary.errors {
//!     eprintln!("{finding}");
//! }
//! ```

pub mod error;
pub mod report;
pub mod spec;
pub mod system;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use report::{Reporter, Severity};
pub use spec::{CgroupSpec, SysSpec};
pub use system::{ValidationOutcome, Validator};

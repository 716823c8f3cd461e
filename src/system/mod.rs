//! Host validators.
//!
//! Each validator checks one aspect of the host against a [`SysSpec`],
//! reports per-item results through a [`Reporter`](crate::report::Reporter)
//! and returns aggregated warnings and errors.
//!
//! [`SysSpec`]: crate::spec::SysSpec

mod cgroups;
mod kernel;
mod os;
mod validator;

pub use cgroups::{
    CGROUPS_ITEM_PREFIX, CgroupsValidator, PROC_CGROUPS_PATH, item_key, parse_enabled_subsystems,
    read_enabled_subsystems,
};
pub use kernel::{KERNEL_VERSION_ITEM, KernelValidator, parse_kernel_version};
pub use os::{OS_ITEM, OsValidator};
pub use validator::{
    Finding, SystemValidator, ValidationOutcome, ValidationSummary, Validator, validate_all,
};

use nix::sys::utsname::UtsName;

use crate::error::ValidationError;

fn uname() -> Result<UtsName, ValidationError> {
    nix::sys::utsname::uname().map_err(|e| ValidationError::ReadFailed {
        context: "uname syscall".to_string(),
        source: std::io::Error::from_raw_os_error(e as i32),
    })
}

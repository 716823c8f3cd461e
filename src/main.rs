//! Node Validator - Entry Point
//!
//! Runs the host preflight checks and exits non-zero if any fail.

use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use node_validator::Error;
use node_validator::report::StreamReporter;
use node_validator::spec::SysSpec;
use node_validator::system::{PROC_CGROUPS_PATH, SystemValidator, validate_all};

/// Node Validator - Check that this host can run workload agents.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON system spec to validate against (defaults to the built-in Linux spec)
    #[arg(long, value_name = "PATH")]
    spec: Option<PathBuf>,

    /// Location of the kernel cgroup subsystem list
    #[arg(long, value_name = "PATH", default_value = PROC_CGROUPS_PATH)]
    proc_cgroups: PathBuf,

    /// Run only the named validators
    #[arg(long, value_name = "NAME", num_args = 1.., value_parser = SystemValidator::NAMES)]
    only: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Report lines go to stdout, logs to stderr
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("Node Validator v{}", env!("CARGO_PKG_VERSION"));

    let spec = match &args.spec {
        Some(path) => {
            info!("Loading system spec from {}", path.display());
            SysSpec::load(path).map_err(Error::from)?
        }
        None => SysSpec::default(),
    };

    let reporter = StreamReporter::stdout();
    let names: Vec<&str> = if args.only.is_empty() {
        SystemValidator::NAMES.to_vec()
    } else {
        args.only.iter().map(String::as_str).collect()
    };
    let validators = SystemValidator::select(names, &reporter, &args.proc_cgroups);

    let summary = validate_all(&validators, &spec);

    if summary.has_errors() {
        error!("Host does not satisfy the system spec");
        return Err(Error::ValidationFailed {
            errors: summary.errors.len(),
            warnings: summary.warnings.len(),
        }
        .into());
    }

    if summary.warnings.is_empty() {
        info!("Host satisfies the system spec");
    } else {
        warn!(
            "Host satisfies the system spec with {} warning(s)",
            summary.warnings.len()
        );
    }

    Ok(())
}

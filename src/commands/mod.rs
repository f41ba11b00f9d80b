mod analyze;
mod batch;
mod check;

pub use analyze::run_analyze;
pub use batch::run_batch;
pub use check::run_check;

use std::path::Path;

use dqc_lib::DqcError;
use tracing::debug;

use crate::cli::AnalysisArgs;
use crate::settings::{format_effective_config, load_config, resolve_settings, ResolvedSettings};

/// Load config and merge it with the CLI flags.
fn prepare_settings(
    config_path: Option<&Path>,
    args: &AnalysisArgs,
    timeout: Option<u64>,
    verbose: bool,
) -> Result<ResolvedSettings, DqcError> {
    let config = load_config(config_path)?;
    let resolved = resolve_settings(args, timeout, &config)?;
    if verbose {
        eprintln!("{}", format_effective_config(&resolved, config_path));
    }
    debug!(?resolved, "settings resolved");
    Ok(resolved)
}

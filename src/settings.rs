use std::path::Path;
use std::time::Duration;

use dqc_lib::{AnalysisOptions, Config, DqcError, ReductionPolicy};

use crate::cli::AnalysisArgs;

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub options: AnalysisOptions,
    pub policy: ReductionPolicy,
    pub timeout: Duration,
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_settings(
    args: &AnalysisArgs,
    cli_timeout: Option<u64>,
    config: &Config,
) -> Result<ResolvedSettings, DqcError> {
    if let Some(dpi) = args.dpi {
        if !(dpi.is_finite() && dpi > 0.0) {
            return Err(DqcError::Config(format!("--dpi must be positive, got {dpi}")));
        }
    }
    if args.pdf_dpi == Some(0) {
        return Err(DqcError::Config("--pdf-dpi must be positive".to_string()));
    }
    if cli_timeout == Some(0) {
        return Err(DqcError::Config("--timeout must be at least 1 second".to_string()));
    }

    let mut options = AnalysisOptions::from_config(config);
    options.declared_dpi = args.dpi;
    if let Some(pdf_dpi) = args.pdf_dpi {
        options.pdf_dpi = pdf_dpi;
    }
    if args.sequential {
        options.parallel = false;
    }

    Ok(ResolvedSettings {
        options,
        policy: args.policy.map(Into::into).unwrap_or(config.policy),
        timeout: cli_timeout
            .map(Duration::from_secs)
            .unwrap_or(config.timeouts.analysis),
    })
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/dqc/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DqcError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        DqcError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DqcError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(settings: &ResolvedSettings, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let t = &settings.options.thresholds;
    let dpi = settings
        .options
        .declared_dpi
        .map(|d| format!("{d} (declared)"))
        .unwrap_or_else(|| format!("{} (assumed)", settings.options.assumed_dpi));
    format!(
        "Effective config [{source}]: policy={:?}, parallel={}, timeout={}s, raster_dpi={}, pdf_dpi={}, thresholds: blur={:.1}, gradient={:.1}, contrast={:.1}, exposure={:.0}-{:.0}, skew<={:.1}, dpi>={:.0}, border>={:.2}, text>={:.3}",
        settings.policy,
        settings.options.parallel,
        settings.timeout.as_secs(),
        dpi,
        settings.options.pdf_dpi,
        t.blur,
        t.gradient,
        t.contrast,
        t.exposure.under,
        t.exposure.over,
        t.skew_tolerance,
        t.dpi_floor,
        t.border_ratio_floor,
        t.text_coverage_floor
    )
}

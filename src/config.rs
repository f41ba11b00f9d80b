use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decision::ReductionPolicy;

/// Top-level configuration, usually read from `dqc.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub thresholds: Thresholds,
    pub rendering: Rendering,
    pub policy: ReductionPolicy,
    /// Run extractors and pages on the rayon pool
    pub parallel: bool,
    pub timeouts: Timeouts,
}

/// Decision thresholds. Every pass flag in a report is derived from one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Minimum Laplacian variance over text pixels
    pub blur: f64,
    /// Minimum median gradient magnitude over text pixels
    pub gradient: f64,
    /// Minimum grayscale standard deviation
    pub contrast: f64,
    pub exposure: ExposureBounds,
    /// Maximum absolute skew in degrees
    pub skew_tolerance: f64,
    /// Laplacian variance above which a page is flagged noisy
    pub noise_ceiling: f64,
    /// Minimum DPI, enforced only when the DPI is known
    pub dpi_floor: f64,
    /// Minimum fraction of background pixels
    pub border_ratio_floor: f64,
    /// Minimum fraction of text pixels
    pub text_coverage_floor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            blur: 100.0,
            gradient: 50.0,
            contrast: 15.0,
            exposure: ExposureBounds::default(),
            skew_tolerance: 2.0,
            noise_ceiling: 500.0,
            dpi_floor: 150.0,
            border_ratio_floor: 0.9,
            text_coverage_floor: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExposureBounds {
    /// Mean intensity below this is under-exposed
    pub under: f64,
    /// Mean intensity above this is over-exposed
    pub over: f64,
}

impl Default for ExposureBounds {
    fn default() -> Self {
        Self {
            under: 50.0,
            over: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rendering {
    /// DPI used for raster inputs that declare none
    pub assumed_dpi: f64,
    /// DPI paged documents are rasterized at
    pub pdf_dpi: u32,
    /// Folder holding the pdfium shared library; the system path is searched when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdfium_dir: Option<PathBuf>,
}

impl Default for Rendering {
    fn default() -> Self {
        Self {
            assumed_dpi: 96.0,
            pdf_dpi: 200,
            pdfium_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub analysis: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            analysis: Duration::from_secs(120),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            rendering: Rendering::default(),
            policy: ReductionPolicy::default(),
            parallel: true,
            timeouts: Timeouts::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// `$HOME/.config/dqc/config.toml`, if a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join("dqc").join("config.toml"))
    }

    /// Load config with priority: explicit path > central config > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.is_file() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.thresholds.validate()?;
        if !(self.rendering.assumed_dpi > 0.0) {
            return Err(format!(
                "assumed dpi must be positive (got {})",
                self.rendering.assumed_dpi
            ));
        }
        if self.rendering.pdf_dpi == 0 {
            return Err("pdf dpi must be positive".to_string());
        }
        if self.timeouts.analysis.is_zero() {
            return Err("analysis timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("blur", self.blur),
            ("gradient", self.gradient),
            ("contrast", self.contrast),
            ("skew_tolerance", self.skew_tolerance),
            ("noise_ceiling", self.noise_ceiling),
            ("dpi_floor", self.dpi_floor),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(format!("threshold {name} must be non-negative (got {value})"));
            }
        }
        for (name, value) in [
            ("border_ratio_floor", self.border_ratio_floor),
            ("text_coverage_floor", self.text_coverage_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("ratio {name} must lie within 0.0-1.0 (got {value})"));
            }
        }
        if !(self.exposure.under <= self.exposure.over) {
            return Err(format!(
                "exposure threshold under ({}) must not exceed over ({})",
                self.exposure.under, self.exposure.over
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert!((cfg.thresholds.blur - 100.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.gradient - 50.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.contrast - 15.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.exposure.under - 50.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.exposure.over - 200.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.skew_tolerance - 2.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.noise_ceiling - 500.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.dpi_floor - 150.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.border_ratio_floor - 0.9).abs() < f64::EPSILON);
        assert!((cfg.thresholds.text_coverage_floor - 0.05).abs() < f64::EPSILON);
        assert!((cfg.rendering.assumed_dpi - 96.0).abs() < f64::EPSILON);
        assert_eq!(cfg.rendering.pdf_dpi, 200);
        assert_eq!(cfg.policy, ReductionPolicy::AllPagesMustPass);
        assert!(cfg.parallel);
        assert_eq!(cfg.timeouts.analysis, Duration::from_secs(120));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let cfg = Config::from_toml_str(
            r#"
policy = "first-page-only"

[thresholds]
blur = 80.0

[thresholds.exposure]
over = 220.0

[rendering]
pdf_dpi = 300

[timeouts]
analysis = "30s"
"#,
        )
        .expect("parse config");

        assert_eq!(cfg.policy, ReductionPolicy::FirstPageOnly);
        assert!((cfg.thresholds.blur - 80.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.gradient - 50.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.exposure.under - 50.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.exposure.over - 220.0).abs() < f64::EPSILON);
        assert_eq!(cfg.rendering.pdf_dpi, 300);
        assert!((cfg.rendering.assumed_dpi - 96.0).abs() < f64::EPSILON);
        assert_eq!(cfg.timeouts.analysis, Duration::from_secs(30));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[thresholds]\nblurr = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("blurr"), "got: {err}");
    }

    #[test]
    fn validate_rejects_out_of_range_ratio() {
        let mut cfg = Config::default();
        cfg.thresholds.border_ratio_floor = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("border_ratio_floor"));
    }

    #[test]
    fn validate_rejects_inverted_exposure_bounds() {
        let mut cfg = Config::default();
        cfg.thresholds.exposure = ExposureBounds {
            under: 210.0,
            over: 200.0,
        };
        assert!(cfg.validate().unwrap_err().contains("exposure"));
    }

    #[test]
    fn validate_rejects_zero_pdf_dpi_and_nan_thresholds() {
        let mut cfg = Config::default();
        cfg.rendering.pdf_dpi = 0;
        assert!(cfg.validate().unwrap_err().contains("pdf dpi"));

        let mut cfg = Config::default();
        cfg.thresholds.contrast = f64::NAN;
        assert!(cfg.validate().unwrap_err().contains("contrast"));
    }

    #[test]
    fn pdfium_dir_is_optional() {
        assert!(Config::default().rendering.pdfium_dir.is_none());
        let cfg = Config::from_toml_str("[rendering]\npdfium_dir = \"/opt/pdfium/lib\"\n")
            .expect("parse config");
        assert_eq!(
            cfg.rendering.pdfium_dir.as_deref(),
            Some(Path::new("/opt/pdfium/lib"))
        );
        assert_eq!(cfg.rendering.pdf_dpi, 200);
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("dqc.toml");
        std::fs::write(&path, "parallel = false\n").expect("write config");

        let cfg = Config::load(Some(&path)).expect("load config");
        assert!(!cfg.parallel);
    }

    #[test]
    fn load_reports_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/dqc.toml"))).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io(_)));
    }
}

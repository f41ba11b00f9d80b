//! Metric extractors for document image quality.
//!
//! Each extractor turns one decoded page into one measurement:
//! - Sharpness (text-masked Laplacian variance + Sobel median)
//! - Skew angle (minimum-area rectangle around the ink)
//! - Contrast and exposure (grayscale statistics)
//! - Resolution (pixels, DPI, inches)
//! - Noise (unmasked Laplacian variance)
//! - Text coverage and border whitespace (Otsu split)
//! - Colour mode

// Submodules
mod color;
mod coverage;
mod intensity;
mod noise;
pub mod ops;
mod resolution;
mod runner;
mod sharpness;
mod skew;

#[cfg(test)]
mod tests;

// Re-exports
pub use color::{check_color, ColorModeCheck};
pub use coverage::{measure_border, measure_text_coverage, BorderCheck, TextCoverageEstimator};
pub use intensity::{measure_contrast, measure_exposure, ContrastEstimator, ExposureEstimator};
pub use noise::{measure_noise, NoiseEstimator};
pub use resolution::{estimate_resolution, ResolutionEstimator};
pub use runner::{assemble_page_report, default_metrics, run_metrics, Metric, MetricKind};
pub use sharpness::{measure_sharpness, TextSharpness};
pub use skew::{
    estimate_skew_angle, measure_skew, min_area_rect_angle, normalize_skew_angle, SkewEstimator,
};

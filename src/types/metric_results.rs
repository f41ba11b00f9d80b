//! Metric result types produced by the extractors.
//!
//! Every result carries its raw score(s) and, where a threshold applies, the
//! sub-verdict derived from it:
//! - Sharpness (text-masked Laplacian variance + Sobel median)
//! - Skew angle
//! - Contrast (grayscale standard deviation)
//! - Resolution (pixels, DPI, inches)
//! - Exposure (mean intensity)
//! - Noise (unmasked Laplacian variance)
//! - Text coverage
//! - Color mode
//! - Border whitespace

use serde::{Deserialize, Serialize};

use super::core::DpiSource;

/// Output of a single extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum MetricResult {
    Sharpness(SharpnessMetric),
    Skew(SkewMetric),
    Contrast(ContrastMetric),
    Resolution(ResolutionMetric),
    Exposure(ExposureMetric),
    Noise(NoiseMetric),
    TextCoverage(TextCoverageMetric),
    Color(ColorMetric),
    Border(BorderMetric),
}

/// Text-aware blur measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharpnessMetric {
    /// Variance of the Laplacian response over text pixels
    pub laplacian_variance: f64,
    /// Median Sobel gradient magnitude over text pixels
    pub gradient_median: f64,
    /// Number of pixels in the opened text mask
    pub text_pixels: u64,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkewMetric {
    /// Estimated rotation in degrees, within [-45, 45]
    pub angle_deg: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastMetric {
    /// Standard deviation of grayscale intensity
    pub score: f64,
    pub passed: bool,
}

/// Pixel dimensions and the physical size they imply.
///
/// Carries no pass flag; the DPI floor is enforced by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionMetric {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: f64,
    pub dpi_source: DpiSource,
    pub width_inch: f64,
    pub height_inch: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureMetric {
    pub mean_brightness: f64,
    pub under_exposed: bool,
    pub over_exposed: bool,
}

impl ExposureMetric {
    pub fn passed(&self) -> bool {
        !self.under_exposed && !self.over_exposed
    }
}

/// Coarse noise proxy: the Laplacian variance of the whole image.
///
/// Strong text edges raise this score as much as sensor noise does, so it is
/// reported for information and does not take part in the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseMetric {
    pub score: f64,
    pub noisy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCoverageMetric {
    /// Fraction of pixels classified as text (0.0 - 1.0)
    pub ratio: f64,
    pub too_little_text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMetric {
    pub is_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderMetric {
    /// Fraction of pixels classified as background (0.0 - 1.0)
    pub white_ratio: f64,
    pub border_artifacts: bool,
}

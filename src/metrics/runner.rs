use crate::config::Thresholds;
use crate::error::DqcError;
use crate::image_loader::DecodedImage;
use crate::types::{MetricResult, PageReport};
use crate::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{
    BorderCheck, ColorModeCheck, ContrastEstimator, ExposureEstimator, NoiseEstimator,
    ResolutionEstimator, SkewEstimator, TextCoverageEstimator, TextSharpness,
};

/// The kind of metric being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Sharpness,
    Skew,
    Contrast,
    Resolution,
    Exposure,
    Noise,
    TextCoverage,
    Color,
    Border,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MetricKind::Sharpness => "sharpness",
                MetricKind::Skew => "skew",
                MetricKind::Contrast => "contrast",
                MetricKind::Resolution => "resolution",
                MetricKind::Exposure => "exposure",
                MetricKind::Noise => "noise",
                MetricKind::TextCoverage => "text_coverage",
                MetricKind::Color => "color",
                MetricKind::Border => "border",
            }
        )
    }
}

impl MetricResult {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricResult::Sharpness(_) => MetricKind::Sharpness,
            MetricResult::Skew(_) => MetricKind::Skew,
            MetricResult::Contrast(_) => MetricKind::Contrast,
            MetricResult::Resolution(_) => MetricKind::Resolution,
            MetricResult::Exposure(_) => MetricKind::Exposure,
            MetricResult::Noise(_) => MetricKind::Noise,
            MetricResult::TextCoverage(_) => MetricKind::TextCoverage,
            MetricResult::Color(_) => MetricKind::Color,
            MetricResult::Border(_) => MetricKind::Border,
        }
    }
}

/// A single image-quality extractor.
///
/// Implementations must be pure functions of the image and thresholds: they may
/// run in any order and on any thread.
pub trait Metric: Send + Sync {
    fn kind(&self) -> MetricKind;
    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult;
}

/// Returns the default set of all metrics.
pub fn default_metrics() -> Vec<Box<dyn Metric>> {
    vec![
        Box::<TextSharpness>::default(),
        Box::<SkewEstimator>::default(),
        Box::<ContrastEstimator>::default(),
        Box::<ResolutionEstimator>::default(),
        Box::<ExposureEstimator>::default(),
        Box::<NoiseEstimator>::default(),
        Box::<TextCoverageEstimator>::default(),
        Box::<ColorModeCheck>::default(),
        Box::<BorderCheck>::default(),
    ]
}

/// Run every metric against one image. Results come back in `metrics` order.
pub fn run_metrics(
    metrics: &[Box<dyn Metric>],
    image: &DecodedImage,
    thresholds: &Thresholds,
    parallel: bool,
) -> Vec<MetricResult> {
    let compute = |metric: &Box<dyn Metric>| {
        let result = metric.compute(image, thresholds);
        debug!(metric = %metric.kind(), ?result, "metric computed");
        result
    };

    if parallel {
        metrics.par_iter().map(compute).collect()
    } else {
        metrics.iter().map(compute).collect()
    }
}

/// Assemble a page report; every metric kind must be present exactly once.
pub fn assemble_page_report(page: u32, results: Vec<MetricResult>) -> Result<PageReport> {
    let mut sharpness = None;
    let mut skew = None;
    let mut contrast = None;
    let mut resolution = None;
    let mut exposure = None;
    let mut noise = None;
    let mut text_coverage = None;
    let mut color = None;
    let mut border = None;

    for result in results {
        let kind = result.kind();
        let duplicate = match result {
            MetricResult::Sharpness(m) => sharpness.replace(m).is_some(),
            MetricResult::Skew(m) => skew.replace(m).is_some(),
            MetricResult::Contrast(m) => contrast.replace(m).is_some(),
            MetricResult::Resolution(m) => resolution.replace(m).is_some(),
            MetricResult::Exposure(m) => exposure.replace(m).is_some(),
            MetricResult::Noise(m) => noise.replace(m).is_some(),
            MetricResult::TextCoverage(m) => text_coverage.replace(m).is_some(),
            MetricResult::Color(m) => color.replace(m).is_some(),
            MetricResult::Border(m) => border.replace(m).is_some(),
        };
        if duplicate {
            return Err(DqcError::metric(format!(
                "Metric {} computed more than once for page {}",
                kind, page
            )));
        }
    }

    let missing: Vec<String> = [
        (MetricKind::Sharpness, sharpness.is_none()),
        (MetricKind::Skew, skew.is_none()),
        (MetricKind::Contrast, contrast.is_none()),
        (MetricKind::Resolution, resolution.is_none()),
        (MetricKind::Exposure, exposure.is_none()),
        (MetricKind::Noise, noise.is_none()),
        (MetricKind::TextCoverage, text_coverage.is_none()),
        (MetricKind::Color, color.is_none()),
        (MetricKind::Border, border.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(kind, _)| kind.to_string())
    .collect();

    match (
        sharpness,
        skew,
        contrast,
        resolution,
        exposure,
        noise,
        text_coverage,
        color,
        border,
    ) {
        (
            Some(sharpness),
            Some(skew),
            Some(contrast),
            Some(resolution),
            Some(exposure),
            Some(noise),
            Some(text_coverage),
            Some(color),
            Some(border),
        ) => Ok(PageReport {
            page,
            sharpness,
            skew,
            contrast,
            resolution,
            exposure,
            noise,
            text_coverage,
            color,
            border,
        }),
        _ => Err(DqcError::metric(format!(
            "Requested metrics not available: {}",
            missing.join(", ")
        ))),
    }
}

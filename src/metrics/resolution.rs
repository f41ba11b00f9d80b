use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{MetricResult, ResolutionMetric};

use super::{Metric, MetricKind};

/// Pixel size and the physical size implied by the page's DPI.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionEstimator;

pub fn estimate_resolution(image: &DecodedImage) -> ResolutionMetric {
    let dpi = image.dpi();
    let to_inches = |px: u32| if dpi > 0.0 { px as f64 / dpi } else { 0.0 };
    ResolutionMetric {
        width_px: image.width(),
        height_px: image.height(),
        dpi,
        dpi_source: image.dpi_source(),
        width_inch: to_inches(image.width()),
        height_inch: to_inches(image.height()),
    }
}

impl Metric for ResolutionEstimator {
    fn kind(&self) -> MetricKind {
        MetricKind::Resolution
    }

    fn compute(&self, image: &DecodedImage, _thresholds: &Thresholds) -> MetricResult {
        MetricResult::Resolution(estimate_resolution(image))
    }
}

use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{ColorMetric, MetricResult};

use super::{Metric, MetricKind};

/// Detects true colour content, as opposed to grayscale stored in RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorModeCheck;

pub fn check_color(image: &DecodedImage) -> ColorMetric {
    if image.source_channels() == 1 {
        return ColorMetric { is_color: false };
    }
    let is_color = image
        .pixels()
        .pixels()
        .any(|px| px.0[0] != px.0[1] || px.0[1] != px.0[2]);
    ColorMetric { is_color }
}

impl Metric for ColorModeCheck {
    fn kind(&self) -> MetricKind {
        MetricKind::Color
    }

    fn compute(&self, image: &DecodedImage, _thresholds: &Thresholds) -> MetricResult {
        MetricResult::Color(check_color(image))
    }
}

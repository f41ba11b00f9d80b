use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{BorderMetric, MetricResult, TextCoverageMetric};

use super::ops::binarize_dark;
use super::{Metric, MetricKind};

/// Share of the page covered by dark (text-coloured) pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCoverageEstimator;

/// Share of uniform background; a low value points at dark scan borders or a
/// bad crop.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderCheck;

pub fn measure_text_coverage(image: &DecodedImage, thresholds: &Thresholds) -> TextCoverageMetric {
    let ratio = binarize_dark(&image.to_gray()).foreground_ratio();
    TextCoverageMetric {
        ratio,
        too_little_text: ratio < thresholds.text_coverage_floor,
    }
}

pub fn measure_border(image: &DecodedImage, thresholds: &Thresholds) -> BorderMetric {
    let white_ratio = binarize_dark(&image.to_gray()).background_ratio();
    BorderMetric {
        white_ratio,
        border_artifacts: white_ratio < thresholds.border_ratio_floor,
    }
}

impl Metric for TextCoverageEstimator {
    fn kind(&self) -> MetricKind {
        MetricKind::TextCoverage
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::TextCoverage(measure_text_coverage(image, thresholds))
    }
}

impl Metric for BorderCheck {
    fn kind(&self) -> MetricKind {
        MetricKind::Border
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::Border(measure_border(image, thresholds))
    }
}

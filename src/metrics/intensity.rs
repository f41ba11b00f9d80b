use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{ContrastMetric, ExposureMetric, MetricResult};

use super::ops::intensity_stats;
use super::{Metric, MetricKind};

/// Global contrast as the standard deviation of grayscale intensity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastEstimator;

/// Exposure from the mean grayscale intensity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExposureEstimator;

pub fn measure_contrast(image: &DecodedImage, thresholds: &Thresholds) -> ContrastMetric {
    let (_, std_dev) = intensity_stats(&image.to_gray());
    ContrastMetric {
        score: std_dev,
        passed: std_dev >= thresholds.contrast,
    }
}

pub fn measure_exposure(image: &DecodedImage, thresholds: &Thresholds) -> ExposureMetric {
    let (mean, _) = intensity_stats(&image.to_gray());
    ExposureMetric {
        mean_brightness: mean,
        under_exposed: mean < thresholds.exposure.under,
        over_exposed: mean > thresholds.exposure.over,
    }
}

impl Metric for ContrastEstimator {
    fn kind(&self) -> MetricKind {
        MetricKind::Contrast
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::Contrast(measure_contrast(image, thresholds))
    }
}

impl Metric for ExposureEstimator {
    fn kind(&self) -> MetricKind {
        MetricKind::Exposure
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::Exposure(measure_exposure(image, thresholds))
    }
}

use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{MetricResult, NoiseMetric};

use super::ops::{laplacian_responses, variance};
use super::{Metric, MetricKind};

/// Laplacian variance of the whole, unmasked page.
///
/// This is the sharpness operator without the text mask, so dense sharp text
/// scores as "noisy" just like grain does. It is a coarse screening signal, not
/// a noise estimator, and stays out of the verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseEstimator;

pub fn measure_noise(image: &DecodedImage, thresholds: &Thresholds) -> NoiseMetric {
    let score = variance(&laplacian_responses(&image.to_gray()));
    NoiseMetric {
        score,
        noisy: score > thresholds.noise_ceiling,
    }
}

impl Metric for NoiseEstimator {
    fn kind(&self) -> MetricKind {
        MetricKind::Noise
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::Noise(measure_noise(image, thresholds))
    }
}

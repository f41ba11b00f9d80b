use imageproc::distance_transform::Norm;
use imageproc::morphology::open;

use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{MetricResult, SharpnessMetric};

use super::ops::{binarize_dark, gradient_magnitudes, laplacian_responses, median, variance};
use super::{Metric, MetricKind};

/// Text-aware blur detection.
///
/// Dark pixels (Otsu split) form the text mask, which is opened with a 3x3
/// square to drop speckle. Edge energy (Laplacian variance) and edge strength
/// (median Sobel magnitude) are then sampled on the text pixels only, so large
/// blank margins cannot dilute the measurement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSharpness;

pub fn measure_sharpness(image: &DecodedImage, thresholds: &Thresholds) -> SharpnessMetric {
    let gray = image.to_gray();
    let binarized = binarize_dark(&gray);
    let text_mask = if binarized.foreground == 0 {
        binarized.mask
    } else {
        open(&binarized.mask, Norm::LInf, 1)
    };

    let laplacian = laplacian_responses(&gray);
    let gradients = gradient_magnitudes(&gray);

    let mut lap_text = Vec::new();
    let mut grad_text = Vec::new();
    for (idx, px) in text_mask.as_raw().iter().enumerate() {
        if *px > 0 {
            lap_text.push(laplacian[idx]);
            grad_text.push(gradients[idx]);
        }
    }

    // empty mask: both statistics are 0 and the check fails
    let laplacian_variance = variance(&lap_text);
    let gradient_median = median(&mut grad_text);

    SharpnessMetric {
        laplacian_variance,
        gradient_median,
        text_pixels: lap_text.len() as u64,
        passed: laplacian_variance >= thresholds.blur && gradient_median >= thresholds.gradient,
    }
}

impl Metric for TextSharpness {
    fn kind(&self) -> MetricKind {
        MetricKind::Sharpness
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::Sharpness(measure_sharpness(image, thresholds))
    }
}

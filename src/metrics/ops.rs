//! Shared pixel operations: Otsu binarization, derivative filters and
//! empty-safe statistics. Every statistic returns 0.0 for an empty selection.

use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::laplacian_filter;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Result of a global Otsu split into dark foreground and light background.
#[derive(Debug, Clone)]
pub struct Binarized {
    /// Otsu level; `None` when the image is empty or holds a single intensity
    pub level: Option<u8>,
    /// 255 where the pixel is foreground (intensity <= level), 0 elsewhere
    pub mask: GrayImage,
    pub foreground: u64,
    pub total: u64,
}

impl Binarized {
    pub fn foreground_ratio(&self) -> f64 {
        ratio(self.foreground, self.total)
    }

    pub fn background_ratio(&self) -> f64 {
        ratio(self.total - self.foreground, self.total)
    }
}

/// Otsu level, or `None` for images with fewer than two distinct intensities.
pub fn otsu_level_checked(gray: &GrayImage) -> Option<u8> {
    let mut raw = gray.as_raw().iter().copied();
    let first = raw.next()?;
    if raw.all(|v| v == first) {
        return None;
    }
    Some(otsu_level(gray))
}

/// Split `gray` at its Otsu level; dark pixels become foreground.
///
/// A blank page has no foreground at all.
pub fn binarize_dark(gray: &GrayImage) -> Binarized {
    let level = otsu_level_checked(gray);
    let (width, height) = gray.dimensions();
    let mut mask = GrayImage::new(width, height);
    let mut foreground = 0u64;

    if let Some(level) = level {
        for (src, dst) in gray.pixels().zip(mask.pixels_mut()) {
            if src.0[0] <= level {
                *dst = Luma([255]);
                foreground += 1;
            }
        }
    }

    Binarized {
        level,
        mask,
        foreground,
        total: width as u64 * height as u64,
    }
}

/// 4-neighbour Laplacian response for every pixel (row-major).
pub fn laplacian_responses(gray: &GrayImage) -> Vec<f64> {
    if is_empty(gray) {
        return Vec::new();
    }
    laplacian_filter(gray)
        .as_raw()
        .iter()
        .map(|&v| v as f64)
        .collect()
}

/// Sobel gradient magnitude `sqrt(gx^2 + gy^2)` for every pixel (row-major).
pub fn gradient_magnitudes(gray: &GrayImage) -> Vec<f64> {
    if is_empty(gray) {
        return Vec::new();
    }
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    gx.as_raw()
        .iter()
        .zip(gy.as_raw())
        .map(|(&x, &y)| (x as f64).hypot(y as f64))
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by N).
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64
}

/// Median; the mean of the two middle values for even lengths.
pub fn median(values: &mut [f64]) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    let mid = len / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if len % 2 == 1 {
        upper
    } else {
        let lower_max = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower_max + upper) / 2.0
    }
}

/// Mean and population standard deviation of the grayscale intensities.
pub fn intensity_stats(gray: &GrayImage) -> (f64, f64) {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return (0.0, 0.0);
    }
    let n = raw.len() as f64;
    let mu = raw.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = raw
        .iter()
        .map(|&v| (v as f64 - mu).powi(2))
        .sum::<f64>()
        / n;
    (mu, var.sqrt())
}

pub fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

pub fn is_empty(gray: &GrayImage) -> bool {
    gray.width() == 0 || gray.height() == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_of_empty_selection_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(median(&mut []), 0.0);
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(intensity_stats(&GrayImage::new(0, 0)), (0.0, 0.0));
    }

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&mut [5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut [7.0]), 7.0);
    }

    #[test]
    fn variance_is_population_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&values) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_image_has_no_otsu_level_and_no_foreground() {
        let white = GrayImage::from_pixel(8, 8, Luma([255]));
        assert_eq!(otsu_level_checked(&white), None);
        let bin = binarize_dark(&white);
        assert_eq!(bin.foreground, 0);
        assert_eq!(bin.total, 64);
        assert_eq!(bin.background_ratio(), 1.0);

        let black = GrayImage::from_pixel(8, 8, Luma([0]));
        assert_eq!(binarize_dark(&black).foreground, 0);
    }

    #[test]
    fn bimodal_image_splits_dark_pixels() {
        let mut gray = GrayImage::from_pixel(10, 10, Luma([200]));
        for x in 0..10 {
            gray.put_pixel(x, 4, Luma([20]));
        }
        let bin = binarize_dark(&gray);
        assert_eq!(bin.foreground, 10);
        assert!((bin.foreground_ratio() - 0.1).abs() < 1e-12);
        assert_eq!(bin.mask.get_pixel(3, 4), &Luma([255]));
        assert_eq!(bin.mask.get_pixel(3, 5), &Luma([0]));
    }

    #[test]
    fn flat_image_has_zero_derivatives() {
        let gray = GrayImage::from_pixel(5, 5, Luma([128]));
        assert!(laplacian_responses(&gray).iter().all(|&v| v == 0.0));
        assert!(gradient_magnitudes(&gray).iter().all(|&v| v == 0.0));
        assert!(laplacian_responses(&GrayImage::new(0, 0)).is_empty());
    }

    #[test]
    fn intensity_stats_match_direct_computation() {
        let gray = GrayImage::from_fn(4, 4, |x, y| Luma([(x * 40 + y * 10) as u8]));
        let values: Vec<f64> = gray.as_raw().iter().map(|&v| v as f64).collect();
        let (mu, sigma) = intensity_stats(&gray);
        assert!((mu - mean(&values)).abs() < 1e-9);
        assert!((sigma - variance(&values).sqrt()).abs() < 1e-9);
    }
}

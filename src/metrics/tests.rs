use super::*;
use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{DpiSource, MetricResult};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;
use std::collections::HashSet;

/// 200x200 page at gray 190 with seven black 3px bars, roughly 8.4% ink.
fn text_page_gray() -> GrayImage {
    GrayImage::from_fn(200, 200, |x, y| {
        if (20..180).contains(&x) && (10..13).contains(&(y % 30)) {
            Luma([0])
        } else {
            Luma([190])
        }
    })
}

fn text_page() -> DecodedImage {
    DecodedImage::from_gray(text_page_gray(), 300.0, DpiSource::Declared)
}

fn blank_page() -> DecodedImage {
    DecodedImage::from_gray(
        GrayImage::from_pixel(100, 100, Luma([255])),
        300.0,
        DpiSource::Declared,
    )
}

/// White page with a dark 300x80 block rotated by `degrees` about the centre.
fn rotated_block(degrees: f64) -> DecodedImage {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let gray = GrayImage::from_fn(400, 400, |x, y| {
        let (dx, dy) = (x as f64 - 200.0, y as f64 - 200.0);
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        if u.abs() < 150.0 && v.abs() < 40.0 {
            Luma([10])
        } else {
            Luma([245])
        }
    });
    DecodedImage::from_gray(gray, 300.0, DpiSource::Declared)
}

#[test]
fn metric_kind_display_is_snake_case() {
    assert_eq!(MetricKind::TextCoverage.to_string(), "text_coverage");
    assert_eq!(MetricKind::Sharpness.to_string(), "sharpness");
    assert_eq!(
        serde_json::to_value(MetricKind::TextCoverage).expect("serialize"),
        "text_coverage"
    );
}

#[test]
fn default_metrics_cover_every_kind_once() {
    let kinds: Vec<MetricKind> = default_metrics().iter().map(|m| m.kind()).collect();
    let unique: HashSet<MetricKind> = kinds.iter().copied().collect();
    assert_eq!(kinds.len(), 9);
    assert_eq!(unique.len(), kinds.len());
}

#[test]
fn clean_text_page_passes_every_check() {
    let thresholds = Thresholds::default();
    let image = text_page();

    let sharpness = measure_sharpness(&image, &thresholds);
    assert!(sharpness.passed, "{sharpness:?}");
    assert_eq!(sharpness.text_pixels, 7 * 3 * 160);
    assert!(sharpness.laplacian_variance > 1000.0);
    assert!((sharpness.gradient_median - 760.0).abs() < 1e-9);

    let skew = measure_skew(&image, &thresholds);
    assert_eq!(skew.angle_deg, 0.0);
    assert!(skew.passed);

    assert!(measure_contrast(&image, &thresholds).passed);

    let exposure = measure_exposure(&image, &thresholds);
    assert!(exposure.passed());
    assert!((exposure.mean_brightness - 190.0 * (1.0 - 0.084)).abs() < 1e-9);

    let coverage = measure_text_coverage(&image, &thresholds);
    assert!((coverage.ratio - 0.084).abs() < 1e-12);
    assert!(!coverage.too_little_text);

    let border = measure_border(&image, &thresholds);
    assert!((border.white_ratio - 0.916).abs() < 1e-12);
    assert!(!border.border_artifacts);
}

#[test]
fn blank_page_has_no_text_and_no_sharpness() {
    let thresholds = Thresholds::default();
    let image = blank_page();

    let sharpness = measure_sharpness(&image, &thresholds);
    assert_eq!(sharpness.laplacian_variance, 0.0);
    assert_eq!(sharpness.gradient_median, 0.0);
    assert_eq!(sharpness.text_pixels, 0);
    assert!(!sharpness.passed);

    assert_eq!(estimate_skew_angle(&image), 0.0);

    let contrast = measure_contrast(&image, &thresholds);
    assert_eq!(contrast.score, 0.0);
    assert!(!contrast.passed);

    let coverage = measure_text_coverage(&image, &thresholds);
    assert_eq!(coverage.ratio, 0.0);
    assert!(coverage.too_little_text);

    let border = measure_border(&image, &thresholds);
    assert_eq!(border.white_ratio, 1.0);
    assert!(!border.border_artifacts);

    let exposure = measure_exposure(&image, &thresholds);
    assert!(exposure.over_exposed);
    assert!(!exposure.under_exposed);
}

#[test]
fn heavy_blur_fails_sharpness() {
    let thresholds = Thresholds::default();
    let blurred = gaussian_blur_f32(&text_page_gray(), 4.0);
    let image = DecodedImage::from_gray(blurred, 300.0, DpiSource::Declared);

    let sharpness = measure_sharpness(&image, &thresholds);
    assert!(sharpness.text_pixels > 0);
    assert!(sharpness.laplacian_variance < thresholds.blur, "{sharpness:?}");
    assert!(!sharpness.passed);
}

#[test]
fn contrast_is_population_std_of_luma() {
    let gray = GrayImage::from_fn(16, 16, |x, y| Luma([((x * 13 + y * 7) % 256) as u8]));
    let image = DecodedImage::from_gray(gray.clone(), 96.0, DpiSource::Assumed);

    let values: Vec<f64> = gray.as_raw().iter().map(|&v| v as f64).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let expected =
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt();

    let contrast = measure_contrast(&image, &Thresholds::default());
    assert!((contrast.score - expected).abs() < 1e-6);
}

#[test]
fn exposure_flags_dark_and_bright_pages() {
    let thresholds = Thresholds::default();
    let dark = DecodedImage::from_gray(
        GrayImage::from_pixel(10, 10, Luma([20])),
        96.0,
        DpiSource::Assumed,
    );
    let bright = DecodedImage::from_gray(
        GrayImage::from_pixel(10, 10, Luma([240])),
        96.0,
        DpiSource::Assumed,
    );

    let dark = measure_exposure(&dark, &thresholds);
    assert!(dark.under_exposed && !dark.over_exposed && !dark.passed());

    let bright = measure_exposure(&bright, &thresholds);
    assert!(bright.over_exposed && !bright.under_exposed && !bright.passed());
}

#[test]
fn rotated_block_skew_sign_follows_rotation() {
    let thresholds = Thresholds::default();

    let clockwise = measure_skew(&rotated_block(5.0), &thresholds);
    assert!((clockwise.angle_deg + 5.0).abs() < 1.0, "{clockwise:?}");
    assert!(!clockwise.passed);

    let counter = measure_skew(&rotated_block(-5.0), &thresholds);
    assert!((counter.angle_deg - 5.0).abs() < 1.0, "{counter:?}");
    assert!(!counter.passed);

    let slight = measure_skew(&rotated_block(1.0), &thresholds);
    assert!(slight.angle_deg.abs() <= 2.0, "{slight:?}");
    assert!(slight.passed);
}

#[test]
fn row_extremes_span_the_same_hull_as_every_ink_pixel() {
    let mut inverted = rotated_block(7.0).to_gray();
    image::imageops::invert(&mut inverted);
    let level = 128;

    let every: Vec<Point<i32>> = inverted
        .enumerate_pixels()
        .filter(|(_, _, px)| px.0[0] > level)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect();
    let extremes = super::skew::ink_row_extremes(&inverted, level);
    assert!(extremes.len() <= 2 * inverted.height() as usize);
    assert!(extremes.len() * 50 < every.len());

    let from_extremes =
        min_area_rect_angle(&imageproc::geometry::convex_hull(extremes.as_slice())).expect("angle");
    let from_every =
        min_area_rect_angle(&imageproc::geometry::convex_hull(every.as_slice())).expect("angle");
    assert!((from_extremes - from_every).abs() < 1e-9, "{from_extremes} vs {from_every}");
}

#[test]
fn min_area_rect_of_axis_aligned_hull_reports_minus_ninety() {
    let hull = [
        Point::new(0, 0),
        Point::new(10, 0),
        Point::new(10, 5),
        Point::new(0, 5),
    ];
    assert_eq!(min_area_rect_angle(&hull), Some(-90.0));
    assert_eq!(normalize_skew_angle(-90.0), 0.0);
}

#[test]
fn collinear_hull_has_no_rectangle() {
    let hull = [Point::new(0, 0), Point::new(5, 0), Point::new(10, 0)];
    assert_eq!(min_area_rect_angle(&hull), None);
    assert_eq!(min_area_rect_angle(&hull[..2]), None);
}

#[test]
fn skew_normalization_maps_edges_to_zero() {
    assert_eq!(normalize_skew_angle(-90.0), 0.0);
    assert_eq!(normalize_skew_angle(90.0), 0.0);
    assert!(normalize_skew_angle(-0.0).is_sign_positive());
    assert_eq!(normalize_skew_angle(-80.0), -10.0);
    assert_eq!(normalize_skew_angle(-10.0), 10.0);
    assert_eq!(normalize_skew_angle(-45.0), 45.0);
}

#[test]
fn skew_needs_at_least_three_ink_pixels() {
    let mut gray = GrayImage::from_pixel(20, 20, Luma([255]));
    gray.put_pixel(3, 3, Luma([0]));
    gray.put_pixel(15, 9, Luma([0]));
    let image = DecodedImage::from_gray(gray, 96.0, DpiSource::Assumed);
    assert_eq!(estimate_skew_angle(&image), 0.0);
}

#[test]
fn color_check_ignores_gray_stored_as_rgb() {
    let gray_rgb = DecodedImage::from_rgb(
        RgbImage::from_pixel(4, 4, Rgb([80, 80, 80])),
        96.0,
        DpiSource::Assumed,
    );
    assert!(!check_color(&gray_rgb).is_color);

    let mut tinted = RgbImage::from_pixel(4, 4, Rgb([80, 80, 80]));
    tinted.put_pixel(2, 2, Rgb([200, 30, 30]));
    let tinted = DecodedImage::from_rgb(tinted, 96.0, DpiSource::Assumed);
    assert!(check_color(&tinted).is_color);

    assert!(!check_color(&blank_page()).is_color);
}

#[test]
fn resolution_reports_inches_from_dpi() {
    let image = DecodedImage::from_gray(
        GrayImage::from_pixel(300, 600, Luma([255])),
        150.0,
        DpiSource::Declared,
    );
    let res = estimate_resolution(&image);
    assert_eq!((res.width_px, res.height_px), (300, 600));
    assert!((res.width_inch - 2.0).abs() < 1e-12);
    assert!((res.height_inch - 4.0).abs() < 1e-12);
    assert_eq!(res.dpi_source, DpiSource::Declared);

    let zero = DecodedImage::from_gray(GrayImage::new(3, 3), 0.0, DpiSource::Assumed);
    let res = estimate_resolution(&zero);
    assert_eq!((res.width_inch, res.height_inch), (0.0, 0.0));
}

#[test]
fn noise_is_unmasked_laplacian_variance() {
    let thresholds = Thresholds::default();
    let flat = DecodedImage::from_gray(
        GrayImage::from_pixel(30, 30, Luma([128])),
        96.0,
        DpiSource::Assumed,
    );
    let flat = measure_noise(&flat, &thresholds);
    assert_eq!(flat.score, 0.0);
    assert!(!flat.noisy);

    // dense sharp text reads as noise
    assert!(measure_noise(&text_page(), &thresholds).noisy);
}

#[test]
fn run_metrics_parallel_matches_sequential() {
    let thresholds = Thresholds::default();
    let image = text_page();
    let metrics = default_metrics();

    let sequential = run_metrics(&metrics, &image, &thresholds, false);
    let parallel = run_metrics(&metrics, &image, &thresholds, true);
    assert_eq!(sequential, parallel);

    let report = assemble_page_report(1, parallel).expect("complete report");
    assert_eq!(report.page, 1);
    assert!(report.sharpness.passed);
}

#[test]
fn assemble_errors_when_metrics_missing() {
    let thresholds = Thresholds::default();
    let image = text_page();
    let metrics: Vec<Box<dyn Metric>> = vec![Box::new(TextSharpness), Box::new(ContrastEstimator)];

    let results = run_metrics(&metrics, &image, &thresholds, false);
    let msg = assemble_page_report(1, results).unwrap_err().to_string();

    assert!(
        msg.contains("Requested metrics not available"),
        "expected missing metrics message, got: {}",
        msg
    );
    assert!(msg.contains("skew"));
    assert!(msg.contains("text_coverage"));
    assert!(!msg.contains("sharpness"));
}

#[test]
fn assemble_rejects_duplicate_metrics() {
    let thresholds = Thresholds::default();
    let image = text_page();
    let mut results = run_metrics(&default_metrics(), &image, &thresholds, false);
    results.push(MetricResult::Skew(measure_skew(&image, &thresholds)));

    let msg = assemble_page_report(2, results).unwrap_err().to_string();
    assert!(msg.contains("more than once"), "{msg}");
}

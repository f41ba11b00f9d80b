use image::{imageops, GrayImage};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use crate::config::Thresholds;
use crate::image_loader::DecodedImage;
use crate::types::{MetricResult, SkewMetric};

use super::ops::otsu_level_checked;
use super::{Metric, MetricKind};

/// Page rotation from the minimum-area rectangle around all ink.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkewEstimator;

pub fn measure_skew(image: &DecodedImage, thresholds: &Thresholds) -> SkewMetric {
    let angle_deg = estimate_skew_angle(image);
    SkewMetric {
        angle_deg,
        passed: angle_deg.abs() <= thresholds.skew_tolerance,
    }
}

/// Skew in degrees; 0.0 when there is too little ink to fit a rectangle.
pub fn estimate_skew_angle(image: &DecodedImage) -> f64 {
    let mut inverted = image.to_gray();
    imageops::invert(&mut inverted);

    let Some(level) = otsu_level_checked(&inverted) else {
        return 0.0;
    };

    let points = ink_row_extremes(&inverted, level);
    if points.len() < 3 {
        return 0.0;
    }

    let hull = convex_hull(points.as_slice());
    match min_area_rect_angle(&hull) {
        Some(raw) => normalize_skew_angle(raw),
        None => 0.0,
    }
}

/// Leftmost and rightmost pixel above `level` in every row. Only these can be
/// vertices of the ink's convex hull.
pub(super) fn ink_row_extremes(gray: &GrayImage, level: u8) -> Vec<Point<i32>> {
    let (width, height) = gray.dimensions();
    let mut points = Vec::new();
    for y in 0..height {
        let is_ink = |x: &u32| gray.get_pixel(*x, y).0[0] > level;
        let Some(left) = (0..width).find(is_ink) else {
            continue;
        };
        let right = (left..width).rev().find(is_ink).unwrap_or(left);
        points.push(Point::new(left as i32, y as i32));
        if right != left {
            points.push(Point::new(right as i32, y as i32));
        }
    }
    points
}

/// Orientation of the minimum-area rectangle enclosing `hull`, in [-90, 0).
///
/// Rotating calipers: the optimal rectangle has one side collinear with a hull
/// edge. Returns `None` for degenerate (collinear) hulls.
pub fn min_area_rect_angle(hull: &[Point<i32>]) -> Option<f64> {
    if hull.len() < 3 {
        return None;
    }

    let mut best: Option<(f64, f64)> = None;
    for (i, start) in hull.iter().enumerate() {
        let end = hull[(i + 1) % hull.len()];
        let dx = (end.x - start.x) as f64;
        let dy = (end.y - start.y) as f64;
        let len = dx.hypot(dy);
        if len == 0.0 {
            continue;
        }
        let (ux, uy) = (dx / len, dy / len);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in hull {
            let (px, py) = (p.x as f64, p.y as f64);
            let u = px * ux + py * uy;
            let v = -px * uy + py * ux;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.map_or(true, |(best_area, _)| area < best_area) {
            best = Some((area, dy.atan2(dx).to_degrees()));
        }
    }

    match best {
        Some((area, theta)) if area > 0.0 => Some(theta.rem_euclid(90.0) - 90.0),
        _ => None,
    }
}

/// Map a rectangle orientation onto a signed skew angle.
///
/// Angles below -45 belong to the rectangle's other side. The degenerate -90
/// output (and negative zero) is reported as 0.
pub fn normalize_skew_angle(raw: f64) -> f64 {
    let angle = if raw < -45.0 { -(90.0 + raw) } else { -raw };
    if angle == -90.0 || angle == 0.0 {
        0.0
    } else {
        angle
    }
}

impl Metric for SkewEstimator {
    fn kind(&self) -> MetricKind {
        MetricKind::Skew
    }

    fn compute(&self, image: &DecodedImage, thresholds: &Thresholds) -> MetricResult {
        MetricResult::Skew(measure_skew(image, thresholds))
    }
}

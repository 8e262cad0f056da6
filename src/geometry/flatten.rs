//! Adaptive flattening of parametric curves into polylines.
use std::f64::consts::FRAC_PI_4;

use crate::math::arc_2d::{ellipse_derivative, ellipse_point};
use crate::math::{Point2, Vector2};

/// Subdivision stops once two samples are closer than this (squared units).
pub const MIN_SQR_DISTANCE: f64 = 1.75;

/// Subdivision continues while the chord turn at the midpoint is sharper
/// than this cosine.
pub const DIVISION_THRESHOLD: f64 = -0.9995;

/// Recursion ceiling for pathological control points.
pub const MAX_SUBDIVISION_DEPTH: usize = 999;

/// Angles smaller than this are treated as zero when walking arcs.
pub const ARC_ZERO_TOLERANCE: f64 = 1e-5;

/// Evaluates a single cubic Bézier at `t`.
#[must_use]
pub fn cubic_point(t: f64, p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2) -> Point2 {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    Point2::from(
        p0.coords * (uu * u)
            + p1.coords * (3.0 * uu * t)
            + p2.coords * (3.0 * u * tt)
            + p3.coords * (tt * t),
    )
}

/// Flattens a Bézier chain of `3n + 1` control points.
///
/// Consecutive curves share their joint point, which is emitted once. Input
/// that is not a valid chain yields the control points unchanged.
#[must_use]
pub fn flatten_cubic_bezier(control_points: &[Point2]) -> Vec<Point2> {
    if control_points.len() < 4 || (control_points.len() - 1) % 3 != 0 {
        return control_points.to_vec();
    }
    let mut points = Vec::new();
    for (i, curve) in control_points.windows(4).step_by(3).enumerate() {
        let [p0, p1, p2, p3] = [&curve[0], &curve[1], &curve[2], &curve[3]];
        if i == 0 {
            points.push(*p0);
        }
        subdivide(&mut points, 0.0, 1.0, [p0, p1, p2, p3], 0);
        points.push(*p3);
    }
    points
}

/// Pushes the interior samples of `(t0, t1)` in order.
fn subdivide(points: &mut Vec<Point2>, t0: f64, t1: f64, curve: [&Point2; 4], depth: usize) {
    if depth > MAX_SUBDIVISION_DEPTH {
        return;
    }
    let [p0, p1, p2, p3] = curve;
    let left = cubic_point(t0, p0, p1, p2, p3);
    let right = cubic_point(t1, p0, p1, p2, p3);
    if (left - right).norm_squared() < MIN_SQR_DISTANCE {
        return;
    }

    let mid_t = (t0 + t1) / 2.0;
    let mid = cubic_point(mid_t, p0, p1, p2, p3);
    let bent = match ((left - mid).try_normalize(0.0), (right - mid).try_normalize(0.0)) {
        (Some(l), Some(r)) => l.dot(&r) > DIVISION_THRESHOLD,
        _ => false,
    };

    if bent || (mid_t - 0.5).abs() < 0.0001 {
        subdivide(points, t0, mid_t, curve, depth + 1);
        points.push(mid);
        subdivide(points, mid_t, t1, curve, depth + 1);
    }
}

/// Flattens an elliptical arc given in center form.
///
/// The arc is walked in steps of at most π/4; each step becomes a cubic
/// Bézier with the standard tangent-handle length and is flattened in turn.
/// The first emitted point is `from` exactly.
#[must_use]
pub fn flatten_elliptical_arc(
    from: &Point2,
    center: &Point2,
    radii: &Vector2,
    x_angle: f64,
    start_angle: f64,
    sweep_angle: f64,
) -> Vec<Point2> {
    let sign = if sweep_angle < 0.0 { -1.0 } else { 1.0 };
    let mut remain = sweep_angle.abs();
    let mut s = start_angle;
    let mut prev = *from;
    let mut points = vec![*from];

    while remain > ARC_ZERO_TOLERANCE {
        let step = remain.min(FRAC_PI_4);
        let signed_step = step * sign;

        let p2 = ellipse_point(center, radii, x_angle, s + signed_step);
        let alpha_t = (signed_step / 2.0).tan();
        let alpha = signed_step.sin() * ((4.0 + 3.0 * alpha_t * alpha_t).sqrt() - 1.0) / 3.0;
        let q1 = prev + ellipse_derivative(radii, x_angle, s) * alpha;
        let q2 = p2 - ellipse_derivative(radii, x_angle, s + signed_step) * alpha;

        let curve = flatten_cubic_bezier(&[prev, q1, q2, p2]);
        points.extend_from_slice(&curve[1..]);

        prev = p2;
        s += signed_step;
        remain -= step;
    }

    points
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn bezier_keeps_endpoints() {
        let pts = flatten_cubic_bezier(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
        ]);
        assert_eq!(pts.first(), Some(&Point2::new(0.0, 0.0)));
        assert_eq!(pts.last(), Some(&Point2::new(100.0, 0.0)));
        assert!(pts.len() > 10, "len={}", pts.len());
    }

    #[test]
    fn bezier_samples_lie_on_curve_in_order() {
        let cp = [
            Point2::new(0.0, 0.0),
            Point2::new(30.0, 60.0),
            Point2::new(70.0, 60.0),
            Point2::new(100.0, 0.0),
        ];
        let pts = flatten_cubic_bezier(&cp);
        for w in pts.windows(2) {
            assert!(w[1].x >= w[0].x, "x must be monotone for this curve");
        }
    }

    #[test]
    fn bezier_chain_shares_joint() {
        let cp = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 20.0),
            Point2::new(20.0, 20.0),
            Point2::new(30.0, 0.0),
            Point2::new(40.0, -20.0),
            Point2::new(50.0, -20.0),
            Point2::new(60.0, 0.0),
        ];
        let pts = flatten_cubic_bezier(&cp);
        let joints = pts.iter().filter(|p| **p == Point2::new(30.0, 0.0)).count();
        assert_eq!(joints, 1);
        assert_eq!(pts.last(), Some(&Point2::new(60.0, 0.0)));
    }

    #[test]
    fn tiny_bezier_collapses_to_few_points() {
        let pts = flatten_cubic_bezier(&[
            Point2::new(0.0, 0.0),
            Point2::new(0.1, 0.1),
            Point2::new(0.2, 0.1),
            Point2::new(0.3, 0.0),
        ]);
        assert!(pts.len() <= 3);
    }

    #[test]
    fn degenerate_bezier_terminates() {
        let p = Point2::new(5.0, 5.0);
        let pts = flatten_cubic_bezier(&[p, p, p, p]);
        assert_eq!(pts.first(), Some(&p));
        assert_eq!(pts.last(), Some(&p));
    }

    #[test]
    fn arc_samples_stay_on_circle() {
        let center = Point2::new(0.0, 0.0);
        let radii = Vector2::new(50.0, 50.0);
        let from = ellipse_point(&center, &radii, 0.0, 0.0);
        let pts = flatten_elliptical_arc(&from, &center, &radii, 0.0, 0.0, PI);
        for p in &pts {
            let r = (p - center).norm();
            assert!((r - 50.0).abs() < 0.05, "r={r}");
        }
        let last = pts.last().copied().unwrap_or(from);
        assert!((last.x + 50.0).abs() < 1e-9 && last.y.abs() < 1e-9);
    }
}

//! Elliptical arc math.
//!
//! Angles are in radians. An ellipse is described by its center, its two
//! radii and the rotation `x_angle` of its x-axis relative to the coordinate
//! x-axis; points on it are addressed by the eccentric angle `t`.
use std::f64::consts::PI;

use super::{Point2, Vector2};

/// Center parameterization of an elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    /// Ellipse center.
    pub center: Point2,
    /// Radii, possibly scaled up so the arc can span its endpoints.
    pub radii: Vector2,
    /// Eccentric angle of the start point.
    pub start_angle: f64,
    /// Signed sweep: positive turns toward increasing angles.
    pub sweep_angle: f64,
}

/// Evaluates a point on the rotated ellipse at eccentric angle `t`.
#[must_use]
pub fn ellipse_point(center: &Point2, radii: &Vector2, x_angle: f64, t: f64) -> Point2 {
    let (sin_x, cos_x) = x_angle.sin_cos();
    let (sin_t, cos_t) = t.sin_cos();
    Point2::new(
        center.x + radii.x * cos_x * cos_t - radii.y * sin_x * sin_t,
        center.y + radii.x * sin_x * cos_t + radii.y * cos_x * sin_t,
    )
}

/// Derivative of [`ellipse_point`] with respect to `t`.
#[must_use]
pub fn ellipse_derivative(radii: &Vector2, x_angle: f64, t: f64) -> Vector2 {
    let (sin_x, cos_x) = x_angle.sin_cos();
    let (sin_t, cos_t) = t.sin_cos();
    Vector2::new(
        -radii.x * cos_x * sin_t - radii.y * sin_x * cos_t,
        -radii.x * sin_x * sin_t + radii.y * cos_x * cos_t,
    )
}

/// Signed angle from `u` to `v` in `[-π, π]`.
#[must_use]
pub fn vector_angle(u: &Vector2, v: &Vector2) -> f64 {
    let len = u.norm() * v.norm();
    if len == 0.0 {
        return 0.0;
    }
    let angle = (u.dot(v) / len).clamp(-1.0, 1.0).acos();
    if u.x * v.y - u.y * v.x < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Returns `true` when an endpoint arc degenerates to a straight line: the
/// endpoints coincide or either radius is (nearly) zero.
#[must_use]
pub fn arc_out_of_range(from: &Point2, to: &Point2, radii: &Vector2, zero_tolerance: f64) -> bool {
    (to - from).norm_squared() < zero_tolerance
        || radii.x.abs() < zero_tolerance
        || radii.y.abs() < zero_tolerance
}

/// Converts an endpoint-parameterized arc (the SVG `A` command) to center
/// parameterization.
///
/// Radii too small to span the endpoints are scaled up uniformly until they
/// just fit.
#[must_use]
pub fn endpoint_to_center(
    from: &Point2,
    to: &Point2,
    radii: &Vector2,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> CenterArc {
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();
    let (sin_r, cos_r) = x_rotation.sin_cos();

    // Midpoint in the rotated frame.
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_r * dx2 + sin_r * dy2;
    let y1p = -sin_r * dx2 + cos_r * dy2;

    let x1ps = x1p * x1p;
    let y1ps = y1p * y1p;
    let ratio = x1ps / (rx * rx) + y1ps / (ry * ry);
    if ratio > 1.0 {
        let s = ratio.sqrt();
        rx *= s;
        ry *= s;
    }
    let rxs = rx * rx;
    let rys = ry * ry;

    let dq = rxs * y1ps + rys * x1ps;
    let pq = if dq == 0.0 { 0.0 } else { (rxs * rys - dq) / dq };
    let mut q = pq.max(0.0).sqrt();
    if large_arc == sweep {
        q = -q;
    }

    let cxp = q * rx * y1p / ry;
    let cyp = -q * ry * x1p / rx;

    let center = Point2::new(
        cos_r * cxp - sin_r * cyp + (from.x + to.x) / 2.0,
        sin_r * cxp + cos_r * cyp + (from.y + to.y) / 2.0,
    );

    let u = Vector2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = Vector2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let start_angle = vector_angle(&Vector2::new(1.0, 0.0), &u);
    let mut delta = vector_angle(&u, &v) % (2.0 * PI);
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    }
    if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    CenterArc {
        center,
        radii: Vector2::new(rx, ry),
        start_angle,
        sweep_angle: delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn ellipse_point_unrotated() {
        let p = ellipse_point(&Point2::new(1.0, 2.0), &Vector2::new(3.0, 4.0), 0.0, PI / 2.0);
        assert!((p.x - 1.0).abs() < TOL, "x={}", p.x);
        assert!((p.y - 6.0).abs() < TOL, "y={}", p.y);
    }

    #[test]
    fn derivative_is_tangent() {
        let r = Vector2::new(2.0, 1.0);
        let d = ellipse_derivative(&r, 0.0, 0.0);
        assert!(d.x.abs() < TOL);
        assert!((d.y - 1.0).abs() < TOL);
    }

    #[test]
    fn semicircle_through_positive_sweep() {
        let arc = endpoint_to_center(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Vector2::new(1.0, 1.0),
            0.0,
            false,
            true,
        );
        assert!((arc.center.x - 1.0).abs() < 1e-6, "cx={}", arc.center.x);
        assert!(arc.center.y.abs() < 1e-6, "cy={}", arc.center.y);
        assert!((arc.sweep_angle - PI).abs() < 1e-6, "sweep={}", arc.sweep_angle);
        let end = ellipse_point(&arc.center, &arc.radii, 0.0, arc.start_angle + arc.sweep_angle);
        assert!((end.x - 2.0).abs() < 1e-6 && end.y.abs() < 1e-6);
    }

    #[test]
    fn small_radii_are_scaled_up() {
        let arc = endpoint_to_center(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Vector2::new(1.0, 1.0),
            0.0,
            false,
            false,
        );
        assert!((arc.radii.x - 5.0).abs() < 1e-9, "rx={}", arc.radii.x);
        assert!((arc.sweep_angle + PI).abs() < 1e-6, "sweep={}", arc.sweep_angle);
    }

    #[test]
    fn large_arc_sweeps_more_than_half() {
        let arc = endpoint_to_center(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 1.0),
            &Vector2::new(1.0, 1.0),
            0.0,
            true,
            true,
        );
        assert!(arc.sweep_angle > PI, "sweep={}", arc.sweep_angle);
    }

    #[test]
    fn degenerate_arcs_are_detected() {
        let p = Point2::new(1.0, 1.0);
        assert!(arc_out_of_range(&p, &p, &Vector2::new(1.0, 1.0), 1e-5));
        assert!(arc_out_of_range(
            &p,
            &Point2::new(2.0, 2.0),
            &Vector2::new(0.0, 1.0),
            1e-5
        ));
    }
}

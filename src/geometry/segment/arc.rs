use crate::error::{GeometryError, Result};
use crate::geometry::flatten::{flatten_elliptical_arc, ARC_ZERO_TOLERANCE};
use crate::math::arc_2d::{arc_out_of_range, ellipse_point, endpoint_to_center};
use crate::math::{is_identity, transform_points, Matrix3, Point2, Vector2};

/// An elliptical arc, flattened at construction.
///
/// Two parameterizations are supported: endpoint form (the SVG `A`
/// command) and center form (center, radii, start and sweep angles).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    points: Vec<Point2>,
}

impl ArcSegment {
    /// Creates an arc from `from` to `to` in SVG endpoint form.
    ///
    /// `rotation` is the ellipse x-axis rotation in degrees. A large arc whose
    /// endpoints coincide is drawn as a full ellipse. Degenerate input (equal
    /// endpoints otherwise, or a zero radius) becomes a straight line.
    #[must_use]
    pub fn from_endpoints(
        from: Point2,
        to: Point2,
        radii: Vector2,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Self {
        let x_angle = rotation.to_radians();
        let radii = radii.abs();
        let full_circle = large_arc
            && (to - from).norm_squared() < ARC_ZERO_TOLERANCE
            && radii.x > 0.0
            && radii.y > 0.0;

        let points = if full_circle {
            let center = from - (ellipse_point(&Point2::origin(), &radii, x_angle, 0.0).coords);
            flatten_elliptical_arc(&from, &center, &radii, x_angle, 0.0, std::f64::consts::TAU)
        } else if arc_out_of_range(&from, &to, &radii, ARC_ZERO_TOLERANCE) {
            vec![from, to]
        } else {
            let arc = endpoint_to_center(&from, &to, &radii, x_angle, large_arc, sweep);
            let mut points = flatten_elliptical_arc(
                &from,
                &arc.center,
                &arc.radii,
                x_angle,
                arc.start_angle,
                arc.sweep_angle,
            );
            // Pin the end to the requested point; the analytic end may drift.
            if let Some(last) = points.last_mut() {
                *last = to;
            }
            points
        };

        Self { points }
    }

    /// Creates an arc in center form.
    ///
    /// `rotation`, `start_angle` and `sweep_angle` are in degrees; the angles
    /// are clamped to `[-360, 360]`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonPositive` if either radius is not positive.
    pub fn from_center(
        center: Point2,
        radii: Vector2,
        rotation: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Result<Self> {
        if radii.x.is_nan() || radii.x <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "radius x",
                value: radii.x,
            }
            .into());
        }
        if radii.y.is_nan() || radii.y <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "radius y",
                value: radii.y,
            }
            .into());
        }

        let x_angle = rotation.to_radians();
        let start = start_angle.clamp(-360.0, 360.0).to_radians();
        let sweep = sweep_angle.clamp(-360.0, 360.0).to_radians();

        let from = ellipse_point(&center, &radii, x_angle, start);
        let points = if sweep.abs() < ARC_ZERO_TOLERANCE {
            vec![from, from]
        } else {
            flatten_elliptical_arc(&from, &center, &radii, x_angle, start, sweep)
        };
        Ok(Self { points })
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn flatten(&self) -> &[Point2] {
        &self.points
    }

    /// Transforms the flattened points.
    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        if is_identity(matrix) {
            return self.clone();
        }
        Self {
            points: transform_points(matrix, &self.points),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_point_near(a: &Point2, b: &Point2, tol: f64, msg: &str) {
        assert!(
            (a - b).norm() < tol,
            "{msg}: ({}, {}) vs ({}, {})",
            a.x,
            a.y,
            b.x,
            b.y
        );
    }

    #[test]
    fn center_form_endpoints_match_analytic() {
        let center = Point2::new(100.0, 100.0);
        let radii = Vector2::new(50.0, 30.0);
        let arc = ArcSegment::from_center(center, radii, 15.0, 30.0, 120.0).unwrap();
        let pts = arc.flatten();
        let x_angle = 15f64.to_radians();
        let start = ellipse_point(&center, &radii, x_angle, 30f64.to_radians());
        let end = ellipse_point(&center, &radii, x_angle, 150f64.to_radians());
        assert_point_near(&pts[0], &start, 1e-6, "start");
        assert_point_near(&pts[pts.len() - 1], &end, 1e-6, "end");
    }

    #[test]
    fn center_form_rejects_non_positive_radius() {
        assert!(ArcSegment::from_center(Point2::origin(), Vector2::new(0.0, 5.0), 0.0, 0.0, 90.0).is_err());
        assert!(ArcSegment::from_center(Point2::origin(), Vector2::new(5.0, -1.0), 0.0, 0.0, 90.0).is_err());
    }

    #[test]
    fn endpoint_form_hits_both_ends() {
        let from = Point2::new(10.0, 315.0);
        let to = Point2::new(162.55, 162.45);
        let arc = ArcSegment::from_endpoints(from, to, Vector2::new(30.0, 50.0), 0.0, false, true);
        let pts = arc.flatten();
        assert_eq!(pts[0], from);
        assert_eq!(pts[pts.len() - 1], to);
        assert!(pts.len() > 2);
    }

    #[test]
    fn zero_radius_collapses_to_line() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(10.0, 0.0);
        let arc = ArcSegment::from_endpoints(from, to, Vector2::new(0.0, 0.0), 0.0, false, false);
        assert_eq!(arc.flatten(), &[from, to]);
    }

    #[test]
    fn coincident_endpoints_collapse_unless_large_arc() {
        let p = Point2::new(5.0, 5.0);
        let line = ArcSegment::from_endpoints(p, p, Vector2::new(10.0, 10.0), 0.0, false, true);
        assert_eq!(line.flatten().len(), 2);

        let circle = ArcSegment::from_endpoints(p, p, Vector2::new(10.0, 10.0), 0.0, true, true);
        let pts = circle.flatten();
        assert!(pts.len() > 8);
        assert_point_near(&pts[0], &p, 1e-9, "circle start");
        assert_point_near(&pts[pts.len() - 1], &p, 1e-6, "circle end");
        let far = pts
            .iter()
            .map(|q| (q - p).norm())
            .fold(0.0_f64, f64::max);
        assert!((far - 20.0).abs() < 0.1, "diameter={far}");
    }
}

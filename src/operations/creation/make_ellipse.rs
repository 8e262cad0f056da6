use super::ensure_positive;
use crate::error::Result;
use crate::geometry::{CubicBezierSegment, Path};
use crate::math::{Point2, Vector2};

/// Handle length of the four-curve circle approximation.
const KAPPA: f64 = 0.552_284_8;

/// Creates an ellipse approximated by four cubic Béziers.
pub struct MakeEllipse {
    center: Point2,
    size: Vector2,
}

impl MakeEllipse {
    /// `size` is the full width and height.
    #[must_use]
    pub fn new(center: Point2, size: Vector2) -> Self {
        Self { center, size }
    }

    #[must_use]
    pub fn circle(center: Point2, radius: f64) -> Self {
        Self::new(center, Vector2::new(radius * 2.0, radius * 2.0))
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonPositive` if the width or height is not
    /// positive.
    pub fn execute(&self) -> Result<Path> {
        ensure_positive("width", self.size.x)?;
        ensure_positive("height", self.size.y)?;

        let half = self.size / 2.0;
        let m = self.center;
        let lo = m - half;
        let hi = m + half;
        let o = half * KAPPA;

        let points = vec![
            Point2::new(lo.x, m.y),
            Point2::new(lo.x, m.y - o.y),
            Point2::new(m.x - o.x, lo.y),
            Point2::new(m.x, lo.y),
            Point2::new(m.x + o.x, lo.y),
            Point2::new(hi.x, m.y - o.y),
            Point2::new(hi.x, m.y),
            Point2::new(hi.x, m.y + o.y),
            Point2::new(m.x + o.x, hi.y),
            Point2::new(m.x, hi.y),
            Point2::new(m.x - o.x, hi.y),
            Point2::new(lo.x, m.y + o.y),
            Point2::new(lo.x, m.y),
        ];
        let segment = CubicBezierSegment::new(points)?;
        Ok(Path::closed(vec![segment.into()]))
    }
}

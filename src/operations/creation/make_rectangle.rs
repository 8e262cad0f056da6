use super::ensure_positive;
use crate::error::Result;
use crate::geometry::Path;
use crate::math::{Point2, Vector2};

/// Creates an axis-aligned rectangle from its minimum corner and size.
pub struct MakeRectangle {
    origin: Point2,
    size: Vector2,
}

impl MakeRectangle {
    #[must_use]
    pub fn new(origin: Point2, size: Vector2) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        let min = Point2::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point2::new(a.x.max(b.x), a.y.max(b.y));
        Self::new(min, max - min)
    }

    /// Executes the operation, returning a counter-clockwise polygon.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonPositive` if the width or height is not
    /// positive.
    pub fn execute(&self) -> Result<Path> {
        ensure_positive("width", self.size.x)?;
        ensure_positive("height", self.size.y)?;
        let (x, y) = (self.origin.x, self.origin.y);
        let (w, h) = (self.size.x, self.size.y);
        Ok(Path::polygon(vec![
            Point2::new(x, y),
            Point2::new(x + w, y),
            Point2::new(x + w, y + h),
            Point2::new(x, y + h),
        ]))
    }
}

use crate::geometry::{SegmentInfo, Shape};

/// Locates the point at a given arc length along a shape's outline.
pub struct PointAlongPath<'a> {
    shape: &'a Shape,
    distance: f64,
}

impl<'a> PointAlongPath<'a> {
    /// Creates a new `PointAlongPath` query.
    #[must_use]
    pub fn new(shape: &'a Shape, distance: f64) -> Self {
        Self { shape, distance }
    }

    /// Executes the query. Distances wrap around the total length, so
    /// negative values count back from the end.
    #[must_use]
    pub fn execute(&self) -> SegmentInfo {
        self.shape.point_along_path(self.distance)
    }
}

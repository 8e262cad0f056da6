use crate::geometry::{PointInfo, Shape};
use crate::math::Point2;

/// Finds the point of a shape's outline nearest to a query point.
pub struct ClosestPoint<'a> {
    shape: &'a Shape,
    point: Point2,
}

impl<'a> ClosestPoint<'a> {
    /// Creates a new `ClosestPoint` query.
    #[must_use]
    pub fn new(shape: &'a Shape, point: Point2) -> Self {
        Self { shape, point }
    }

    /// Executes the query.
    ///
    /// For composites the nearest figure wins and `distance_along_path`
    /// counts the lengths of the figures before it. The distance is negative
    /// when the shape contains the point. Returns `None` for a shape with no
    /// figures.
    #[must_use]
    pub fn execute(&self) -> Option<PointInfo> {
        let mut offset = 0.0;
        let mut best: Option<PointInfo> = None;
        for path in self.shape.paths() {
            let mut info = path.distance(&self.point);
            info.distance_along_path += offset;
            offset += path.length();
            if best.is_none_or(|b| info.distance_from_path.abs() < b.distance_from_path.abs()) {
                best = Some(info);
            }
        }

        best.map(|mut info| {
            let distance = info.distance_from_path.abs();
            info.distance_from_path = if self.shape.contains(&self.point) { -distance } else { distance };
            info
        })
    }
}

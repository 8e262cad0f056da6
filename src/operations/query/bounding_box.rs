use crate::geometry::Shape;
use crate::math::Bounds;

/// Computes the axis-aligned bounds of a shape.
pub struct BoundingBox<'a> {
    shape: &'a Shape,
}

impl<'a> BoundingBox<'a> {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the query. An empty composite has zero-size bounds at the
    /// origin.
    #[must_use]
    pub fn execute(&self) -> Bounds {
        self.shape.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ComplexPolygon, Path};
    use crate::math::Point2;

    #[test]
    fn bounds_of_bezier_control_hull() {
        let mut builder = crate::operations::builder::PathBuilder::new();
        builder
            .move_to(Point2::new(0.0, 0.0))
            .cubic_bezier_to(Point2::new(0.0, 10.0), Point2::new(10.0, 10.0), Point2::new(10.0, 0.0));
        let shape = builder.build();
        let b = BoundingBox::new(&shape).execute();
        assert!(b.min.x.abs() < 1e-9 && (b.max.x - 10.0).abs() < 1e-9);
        // The curve peaks at 3/4 of the control height.
        assert!(b.max.y <= 7.5 + 1e-9 && b.max.y > 6.5);
    }

    #[test]
    fn empty_composite_is_zero_sized() {
        let shape: Shape = ComplexPolygon::new(Vec::<Path>::new()).into();
        let b = BoundingBox::new(&shape).execute();
        assert!(b.width().abs() < 1e-12);
        assert_eq!(b.min, Point2::origin());
    }
}

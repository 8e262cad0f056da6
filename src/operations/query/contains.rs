use crate::geometry::Shape;
use crate::math::polygon_2d::winding_number;
use crate::math::Point2;
use crate::operations::boolean::FillRule;

/// Tests whether a point lies inside the closed figures of a shape.
pub struct Contains<'a> {
    shape: &'a Shape,
    point: Point2,
    fill_rule: FillRule,
}

impl<'a> Contains<'a> {
    /// Creates a new `Contains` query using the even-odd rule.
    #[must_use]
    pub fn new(shape: &'a Shape, point: Point2) -> Self {
        Self {
            shape,
            point,
            fill_rule: FillRule::EvenOdd,
        }
    }

    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Executes the query. Open figures never contain anything.
    #[must_use]
    pub fn execute(&self) -> bool {
        if self.fill_rule == FillRule::EvenOdd {
            return self.shape.contains(&self.point);
        }
        let winding: i32 = self
            .shape
            .flatten()
            .iter()
            .filter(|f| f.closed)
            .map(|f| winding_number(&self.point, &f.points))
            .sum();
        self.fill_rule.is_filled(winding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ComplexPolygon, Path};

    fn square(x: f64, y: f64, size: f64) -> Path {
        Path::polygon(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
    }

    #[test]
    fn overlap_depends_on_fill_rule() {
        let shape: Shape = ComplexPolygon::new(vec![square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)]).into();
        let overlap = Point2::new(7.0, 5.0);
        assert!(!Contains::new(&shape, overlap).execute());
        assert!(Contains::new(&shape, overlap).with_fill_rule(FillRule::NonZero).execute());
        assert!(Contains::new(&shape, overlap).with_fill_rule(FillRule::Positive).execute());
        assert!(!Contains::new(&shape, overlap).with_fill_rule(FillRule::Negative).execute());
    }

    #[test]
    fn open_figures_are_empty() {
        let shape: Shape = Path::polyline(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ])
        .into();
        assert!(!Contains::new(&shape, Point2::new(8.0, 2.0)).with_fill_rule(FillRule::NonZero).execute());
    }
}

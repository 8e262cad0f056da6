use crate::geometry::Shape;

/// Computes the total length of every figure of a shape.
pub struct Length<'a> {
    shape: &'a Shape,
}

impl<'a> Length<'a> {
    /// Creates a new `Length` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the query, returning the summed length of the flattened
    /// figures. Closed figures include their closing edge.
    #[must_use]
    pub fn execute(&self) -> f64 {
        self.shape.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ComplexPolygon, Path};
    use crate::math::Point2;

    #[test]
    fn line_length_3_4_5() {
        let shape: Shape = Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)]).into();
        assert!((Length::new(&shape).execute() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn closed_figures_include_closing_edge() {
        let triangle = Path::polygon(vec![Point2::new(0.0, 0.0), Point2::new(3.0, 0.0), Point2::new(0.0, 4.0)]);
        let shape: Shape = ComplexPolygon::new(vec![triangle.clone(), triangle]).into();
        assert!((Length::new(&shape).execute() - 24.0).abs() < 1e-10);
    }
}

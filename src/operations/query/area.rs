use crate::geometry::Shape;
use crate::math::polygon_2d::signed_area;

/// Computes the signed area enclosed by a shape's closed figures.
///
/// Counter-clockwise figures add and clockwise figures subtract, so a
/// normalized shape with holes yields its filled area.
pub struct Area<'a> {
    shape: &'a Shape,
}

impl<'a> Area<'a> {
    /// Creates a new `Area` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    #[must_use]
    pub fn execute(&self) -> f64 {
        self.shape
            .flatten()
            .iter()
            .filter(|f| f.closed)
            .map(|f| signed_area(&f.points))
            .sum()
    }
}

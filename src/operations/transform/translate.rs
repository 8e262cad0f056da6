use super::apply;
use crate::error::Result;
use crate::geometry::Shape;
use crate::math::{Matrix3, Vector2};

/// Translates a shape by a displacement vector.
pub struct Translate<'a> {
    shape: &'a Shape,
    displacement: Vector2,
}

impl<'a> Translate<'a> {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(shape: &'a Shape, displacement: Vector2) -> Self {
        Self { shape, displacement }
    }

    /// Executes the translation, returning the moved copy.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the displacement is not
    /// finite.
    pub fn execute(&self) -> Result<Shape> {
        apply(self.shape, &Matrix3::new_translation(&self.displacement))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Path;
    use crate::math::Point2;

    #[test]
    fn moves_bounds() {
        let shape: Shape = Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).into();
        let moved = Translate::new(&shape, Vector2::new(3.0, -2.0)).execute().unwrap();
        let b = moved.bounds();
        assert!((b.min.x - 3.0).abs() < 1e-12 && (b.min.y + 2.0).abs() < 1e-12);
    }

    #[test]
    fn nan_displacement_is_rejected() {
        let shape: Shape = Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).into();
        assert!(Translate::new(&shape, Vector2::new(f64::NAN, 0.0)).execute().is_err());
    }
}

use super::apply;
use crate::error::{OperationError, Result};
use crate::geometry::Shape;
use crate::math::{Matrix3, Point2, Vector2};

/// Mirrors a shape across a line given by a point and a direction.
///
/// Mirroring flips the orientation of every closed figure.
pub struct Mirror<'a> {
    shape: &'a Shape,
    line_origin: Point2,
    line_direction: Vector2,
}

impl<'a> Mirror<'a> {
    /// Creates a new `Mirror` operation.
    #[must_use]
    pub fn new(shape: &'a Shape, line_origin: Point2, line_direction: Vector2) -> Self {
        Self {
            shape,
            line_origin,
            line_direction,
        }
    }

    /// Executes the mirror, returning the reflected copy.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the direction has zero
    /// length or the line is not finite.
    pub fn execute(&self) -> Result<Shape> {
        let len = self.line_direction.norm();
        if len <= 0.0 || !len.is_finite() {
            return Err(OperationError::InvalidInput("mirror direction must be non-zero".to_owned()).into());
        }
        let d = self.line_direction / len;
        // Householder reflection across the line's direction.
        let reflect = Matrix3::new(
            2.0 * d.x * d.x - 1.0,
            2.0 * d.x * d.y,
            0.0,
            2.0 * d.x * d.y,
            2.0 * d.y * d.y - 1.0,
            0.0,
            0.0,
            0.0,
            1.0,
        );
        let o = self.line_origin.coords;
        let matrix = Matrix3::new_translation(&o) * reflect * Matrix3::new_translation(&-o);
        apply(self.shape, &matrix)
    }
}

use super::apply;
use crate::error::{OperationError, Result};
use crate::geometry::Shape;
use crate::math::{Matrix3, Point2, Vector2};

/// Scales a shape about a center point, optionally by different factors
/// along each axis.
pub struct Scale<'a> {
    shape: &'a Shape,
    factors: Vector2,
    center: Option<Point2>,
}

impl<'a> Scale<'a> {
    /// Creates a new uniform `Scale` operation about the center of the
    /// shape's bounds.
    #[must_use]
    pub fn new(shape: &'a Shape, factor: f64) -> Self {
        Self::non_uniform(shape, Vector2::new(factor, factor))
    }

    #[must_use]
    pub fn non_uniform(shape: &'a Shape, factors: Vector2) -> Self {
        Self {
            shape,
            factors,
            center: None,
        }
    }

    #[must_use]
    pub fn about(mut self, center: Point2) -> Self {
        self.center = Some(center);
        self
    }

    /// Executes the scaling.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if a factor is zero or the
    /// transform is not finite.
    #[allow(clippy::float_cmp)]
    pub fn execute(&self) -> Result<Shape> {
        if self.factors.x == 0.0 || self.factors.y == 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "scale factors must be non-zero, got ({}, {})",
                self.factors.x, self.factors.y
            )).into());
        }
        let center = self.center.unwrap_or_else(|| self.shape.bounds().center());
        let matrix = Matrix3::new_translation(&center.coords)
            * Matrix3::new_nonuniform_scaling(&self.factors)
            * Matrix3::new_translation(&-center.coords);
        apply(self.shape, &matrix)
    }
}

use super::apply;
use crate::error::Result;
use crate::geometry::Shape;
use crate::math::{Matrix3, Point2};

/// Rotates a shape counter-clockwise about a center point.
pub struct Rotate<'a> {
    shape: &'a Shape,
    angle: f64,
    center: Option<Point2>,
}

impl<'a> Rotate<'a> {
    /// Creates a new `Rotate` operation about the center of the shape's
    /// bounds. `angle` is in radians.
    #[must_use]
    pub fn new(shape: &'a Shape, angle: f64) -> Self {
        Self {
            shape,
            angle,
            center: None,
        }
    }

    #[must_use]
    pub fn about(mut self, center: Point2) -> Self {
        self.center = Some(center);
        self
    }

    /// Executes the rotation.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the angle or center is not
    /// finite.
    pub fn execute(&self) -> Result<Shape> {
        let center = self.center.unwrap_or_else(|| self.shape.bounds().center());
        let matrix = Matrix3::new_translation(&center.coords)
            * Matrix3::new_rotation(self.angle)
            * Matrix3::new_translation(&-center.coords);
        apply(self.shape, &matrix)
    }
}

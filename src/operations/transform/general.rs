use super::apply;
use crate::error::Result;
use crate::geometry::Shape;
use crate::math::Matrix3;

/// Applies an arbitrary 3x3 homogeneous transform to a shape.
pub struct GeneralTransform<'a> {
    shape: &'a Shape,
    matrix: Matrix3,
}

impl<'a> GeneralTransform<'a> {
    /// Creates a new `GeneralTransform` operation.
    #[must_use]
    pub fn new(shape: &'a Shape, matrix: Matrix3) -> Self {
        Self { shape, matrix }
    }

    /// Executes the transformation. Every segment is transformed through
    /// its control points, so curves stay curves.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the matrix has non-finite
    /// entries.
    pub fn execute(&self) -> Result<Shape> {
        apply(self.shape, &self.matrix)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Path;
    use crate::math::Point2;

    #[test]
    fn shear_moves_top_edge() {
        let shape: Shape = Path::polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .into();
        let shear = Matrix3::new(1.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let sheared = GeneralTransform::new(&shape, shear).execute().unwrap();
        assert!((sheared.bounds().max.x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn identity_keeps_shape() {
        let shape: Shape = Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0)]).into();
        let same = GeneralTransform::new(&shape, Matrix3::identity()).execute().unwrap();
        assert_eq!(same.flatten(), shape.flatten());
    }

    #[test]
    fn infinite_matrix_is_rejected() {
        let shape: Shape = Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0)]).into();
        let bad = Matrix3::new_scaling(f64::INFINITY);
        assert!(GeneralTransform::new(&shape, bad).execute().is_err());
    }
}

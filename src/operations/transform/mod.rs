mod general;
mod mirror;
mod rotate;
mod scale;
mod translate;

pub use general::GeneralTransform;
pub use mirror::Mirror;
pub use rotate::Rotate;
pub use scale::Scale;
pub use translate::Translate;

use crate::error::{OperationError, Result};
use crate::geometry::Shape;
use crate::math::Matrix3;

fn apply(shape: &Shape, matrix: &Matrix3) -> Result<Shape> {
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(OperationError::InvalidInput("transform must be finite".to_owned()).into());
    }
    Ok(shape.transform(matrix))
}

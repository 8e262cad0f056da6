pub mod arc_2d;
pub mod bounds;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

pub use bounds::Bounds;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3x3 homogeneous matrix used for 2D affine transforms.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `true` if the matrix is the identity transform.
#[must_use]
pub fn is_identity(matrix: &Matrix3) -> bool {
    matrix.is_identity(TOLERANCE)
}

/// Applies an affine transform to a point.
#[must_use]
pub fn transform_point(matrix: &Matrix3, point: &Point2) -> Point2 {
    matrix.transform_point(point)
}

/// Applies an affine transform to every point of a slice.
#[must_use]
pub fn transform_points(matrix: &Matrix3, points: &[Point2]) -> Vec<Point2> {
    points.iter().map(|p| matrix.transform_point(p)).collect()
}

/// Returns `true` if both coordinates of the point are finite.
#[must_use]
pub fn is_finite(point: &Point2) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_moves_points() {
        let m = Matrix3::new_translation(&Vector2::new(3.0, -2.0));
        let p = transform_point(&m, &Point2::new(1.0, 1.0));
        assert!((p.x - 4.0).abs() < TOLERANCE);
        assert!((p.y + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn identity_is_detected() {
        assert!(is_identity(&Matrix3::identity()));
        assert!(!is_identity(&Matrix3::new_scaling(2.0)));
    }
}

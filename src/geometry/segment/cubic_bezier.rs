use std::sync::OnceLock;

use crate::error::{GeometryError, Result};
use crate::geometry::flatten::flatten_cubic_bezier;
use crate::math::{is_identity, transform_points, Matrix3, Point2};

/// A chain of cubic Bézier curves sharing end points (`3n + 1` control points).
#[derive(Debug, Clone)]
pub struct CubicBezierSegment {
    control_points: Vec<Point2>,
    flattened: OnceLock<Vec<Point2>>,
}

impl CubicBezierSegment {
    /// Creates a Bézier chain.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidControlPoints` unless the count is
    /// `3n + 1` with `n >= 1`.
    pub fn new(control_points: Vec<Point2>) -> Result<Self> {
        let count = control_points.len();
        if count < 4 || (count - 1) % 3 != 0 {
            return Err(GeometryError::InvalidControlPoints { count }.into());
        }
        Ok(Self {
            control_points,
            flattened: OnceLock::new(),
        })
    }

    /// Creates a single cubic curve.
    #[must_use]
    pub fn single(start: Point2, control1: Point2, control2: Point2, end: Point2) -> Self {
        Self {
            control_points: vec![start, control1, control2, end],
            flattened: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.control_points[self.control_points.len() - 1]
    }

    #[must_use]
    pub fn flatten(&self) -> &[Point2] {
        self.flattened
            .get_or_init(|| flatten_cubic_bezier(&self.control_points))
    }

    /// Transforms the control points; the flattened cache is rebuilt lazily.
    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        if is_identity(matrix) {
            return self.clone();
        }
        Self {
            control_points: transform_points(matrix, &self.control_points),
            flattened: OnceLock::new(),
        }
    }
}

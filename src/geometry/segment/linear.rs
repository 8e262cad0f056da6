use crate::error::{GeometryError, Result};
use crate::math::{is_identity, transform_points, Matrix3, Point2};

/// A straight polyline segment of two or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSegment {
    points: Vec<Point2>,
}

impl LinearSegment {
    /// Creates a single straight line from `start` to `end`.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            points: vec![start, end],
        }
    }

    /// Creates a polyline segment.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if fewer than 2 points are given.
    pub fn from_points(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                required: 2,
                actual: points.len(),
            }
            .into());
        }
        Ok(Self { points })
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// A polyline flattens to itself.
    #[must_use]
    pub fn flatten(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        if is_identity(matrix) {
            return self.clone();
        }
        Self {
            points: transform_points(matrix, &self.points),
        }
    }
}

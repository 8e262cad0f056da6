mod arc;
mod cubic_bezier;
mod linear;

pub use arc::ArcSegment;
pub use cubic_bezier::CubicBezierSegment;
pub use linear::LinearSegment;

use crate::math::{Matrix3, Point2};

/// One piece of a path: a polyline, a Bézier chain or an elliptical arc.
///
/// Segments are immutable; [`LineSegment::transform`] returns a new segment.
#[derive(Debug, Clone)]
pub enum LineSegment {
    Linear(LinearSegment),
    CubicBezier(CubicBezierSegment),
    EllipticalArc(ArcSegment),
}

impl LineSegment {
    /// Returns the last point of the segment.
    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Linear(s) => s.end_point(),
            Self::CubicBezier(s) => s.end_point(),
            Self::EllipticalArc(s) => s.end_point(),
        }
    }

    /// Returns the segment as a polyline. Curves are flattened on first use
    /// and cached.
    #[must_use]
    pub fn flatten(&self) -> &[Point2] {
        match self {
            Self::Linear(s) => s.flatten(),
            Self::CubicBezier(s) => s.flatten(),
            Self::EllipticalArc(s) => s.flatten(),
        }
    }

    /// Returns a transformed copy of the segment.
    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(s.transform(matrix)),
            Self::CubicBezier(s) => Self::CubicBezier(s.transform(matrix)),
            Self::EllipticalArc(s) => Self::EllipticalArc(s.transform(matrix)),
        }
    }
}

impl From<LinearSegment> for LineSegment {
    fn from(segment: LinearSegment) -> Self {
        Self::Linear(segment)
    }
}

impl From<CubicBezierSegment> for LineSegment {
    fn from(segment: CubicBezierSegment) -> Self {
        Self::CubicBezier(segment)
    }
}

impl From<ArcSegment> for LineSegment {
    fn from(segment: ArcSegment) -> Self {
        Self::EllipticalArc(segment)
    }
}

use std::sync::OnceLock;

use super::flattened_path::{FlattenedPath, PointInfo, SegmentInfo};
use super::segment::{LineSegment, LinearSegment};
use crate::math::{is_identity, Bounds, Matrix3, Point2};
use crate::operations::boolean::FillRule;

/// An ordered sequence of segments forming one figure, open or closed.
///
/// The simplified polyline is computed on first use and cached.
#[derive(Debug, Clone)]
pub struct Path {
    segments: Vec<LineSegment>,
    closed: bool,
    remove_close_and_collinear: bool,
    flattened: OnceLock<FlattenedPath>,
}

impl Path {
    /// Creates an open path.
    #[must_use]
    pub fn new(segments: Vec<LineSegment>) -> Self {
        Self::with_closed(segments, false)
    }

    /// Creates a closed path (a polygon).
    #[must_use]
    pub fn closed(segments: Vec<LineSegment>) -> Self {
        Self::with_closed(segments, true)
    }

    /// Creates a closed polygon from a single point list.
    ///
    /// Fewer than two points yield an empty polygon.
    #[must_use]
    pub fn polygon(points: Vec<Point2>) -> Self {
        Self::closed(Self::points_to_segments(points))
    }

    /// Creates an open polyline from a single point list.
    #[must_use]
    pub fn polyline(points: Vec<Point2>) -> Self {
        Self::new(Self::points_to_segments(points))
    }

    #[must_use]
    pub fn with_closed(segments: Vec<LineSegment>, closed: bool) -> Self {
        Self {
            segments,
            closed,
            remove_close_and_collinear: true,
            flattened: OnceLock::new(),
        }
    }

    /// Keeps near-duplicate and collinear points when flattening.
    ///
    /// Clipper output is already clean and relies on its exact vertices.
    #[must_use]
    pub fn preserving_points(mut self) -> Self {
        self.remove_close_and_collinear = false;
        self.flattened = OnceLock::new();
        self
    }

    fn points_to_segments(points: Vec<Point2>) -> Vec<LineSegment> {
        LinearSegment::from_points(points)
            .map(|s| vec![LineSegment::Linear(s)])
            .unwrap_or_default()
    }

    #[must_use]
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns `true` if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the cached simplified polyline.
    #[must_use]
    pub fn flattened(&self) -> &FlattenedPath {
        self.flattened.get_or_init(|| {
            let points: Vec<Point2> = self
                .segments
                .iter()
                .flat_map(|s| s.flatten().iter().copied())
                .collect();
            FlattenedPath::new(&points, self.closed, self.remove_close_and_collinear)
        })
    }

    /// Returns the simplified points of the path.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        self.flattened().points()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.flattened().bounds()
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.flattened().length()
    }

    /// Distance from `point` to the path; negative inside a closed path.
    #[must_use]
    pub fn distance(&self, point: &Point2) -> PointInfo {
        let mut info = self.flattened().distance_from_path(point);
        if self.closed && self.flattened().contains(point) {
            info.distance_from_path = -info.distance_from_path;
        }
        info
    }

    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.flattened().contains(point)
    }

    #[must_use]
    pub fn point_along_path(&self, distance: f64) -> SegmentInfo {
        self.flattened().point_along_path(distance)
    }

    /// Points where the segment `start`-`end` crosses the path, nearest to
    /// `start` first.
    #[must_use]
    pub fn find_intersections(&self, start: Point2, end: Point2, fill_rule: FillRule) -> Vec<Point2> {
        self.flattened().find_intersections(start, end, fill_rule)
    }

    /// Returns a transformed copy.
    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        if is_identity(matrix) {
            return self.clone();
        }
        Self {
            segments: self.segments.iter().map(|s| s.transform(matrix)).collect(),
            closed: self.closed,
            remove_close_and_collinear: self.remove_close_and_collinear,
            flattened: OnceLock::new(),
        }
    }

    /// Returns the path as a closed polygon.
    #[must_use]
    pub fn as_closed_path(&self) -> Self {
        if self.closed {
            return self.clone();
        }
        Self {
            segments: self.segments.clone(),
            closed: true,
            remove_close_and_collinear: self.remove_close_and_collinear,
            flattened: OnceLock::new(),
        }
    }
}

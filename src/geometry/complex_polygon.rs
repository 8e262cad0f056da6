use super::flattened_path::{clamp_to_bounds, SegmentInfo};
use super::path::Path;
use super::shape::{PathType, Shape};
use crate::math::{Bounds, Matrix3, Point2};
use crate::operations::boolean::FillRule;

/// An unordered aggregate of paths.
///
/// No nesting is implied; holes are resolved later by the ring normalizer
/// or the clipper's fill rule.
#[derive(Debug, Clone, Default)]
pub struct ComplexPolygon {
    paths: Vec<Path>,
}

impl ComplexPolygon {
    #[must_use]
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// Collects the paths of several shapes into one composite.
    #[must_use]
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        let mut paths = Vec::new();
        for shape in shapes {
            match shape {
                Shape::Path(p) => paths.push(p),
                Shape::Complex(c) => paths.extend(c.paths),
            }
        }
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    #[must_use]
    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn path_type(&self) -> PathType {
        let closed = self.paths.iter().filter(|p| p.is_closed()).count();
        if closed == self.paths.len() {
            PathType::Closed
        } else if closed == 0 {
            PathType::Open
        } else {
            PathType::Mixed
        }
    }

    /// Union of the children's bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        if self.paths.is_empty() {
            return Bounds::new(Point2::origin(), Point2::origin());
        }
        self.paths
            .iter()
            .fold(Bounds::empty(), |acc, p| acc.union(&p.bounds()))
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.paths.iter().map(Path::length).sum()
    }

    /// A point is inside when an odd number of children contain it.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.paths.iter().filter(|p| p.contains(point)).count() % 2 == 1
    }

    /// Crossings with every child, nearest to `start` first. The fill rule
    /// applies to each child on its own.
    #[must_use]
    pub fn find_intersections(&self, start: Point2, end: Point2, fill_rule: FillRule) -> Vec<Point2> {
        let bounds = self.bounds();
        let (start, end) = (clamp_to_bounds(start, &bounds), clamp_to_bounds(end, &bounds));
        let mut hits: Vec<Point2> = self
            .paths
            .iter()
            .flat_map(|p| p.find_intersections(start, end, fill_rule))
            .collect();
        hits.sort_by(|a, b| (a - start).norm_squared().total_cmp(&(b - start).norm_squared()));
        hits
    }

    /// Walks the children in order, wrapping around the total length.
    #[must_use]
    pub fn point_along_path(&self, distance: f64) -> SegmentInfo {
        let total = self.length();
        let mut remaining = if total > 0.0 { distance.rem_euclid(total) } else { 0.0 };
        for p in &self.paths {
            let len = p.length();
            if len >= remaining {
                return p.point_along_path(remaining);
            }
            remaining -= len;
        }
        SegmentInfo {
            point: Point2::origin(),
            angle: 0.0,
        }
    }

    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        Self {
            paths: self.paths.iter().map(|p| p.transform(matrix)).collect(),
        }
    }

    #[must_use]
    pub fn as_closed_path(&self) -> Self {
        Self {
            paths: self.paths.iter().map(Path::as_closed_path).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, size: f64) -> Path {
        Path::polygon(vec![
            Point2::new(x, 0.0),
            Point2::new(x + size, 0.0),
            Point2::new(x + size, size),
            Point2::new(x, size),
        ])
    }

    #[test]
    fn intersections_merge_children_in_order() {
        let c = ComplexPolygon::new(vec![square(10.0, 3.0), square(0.0, 2.0)]);
        let hits = c.find_intersections(
            Point2::new(f64::NEG_INFINITY, 1.0),
            Point2::new(f64::INFINITY, 1.0),
            FillRule::EvenOdd,
        );
        let xs: Vec<f64> = hits.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 10.0, 13.0]);
    }

    #[test]
    fn bounds_union_children() {
        let c = ComplexPolygon::new(vec![square(0.0, 2.0), square(10.0, 3.0)]);
        let b = c.bounds();
        assert_eq!(b.min, Point2::new(0.0, 0.0));
        assert_eq!(b.max, Point2::new(13.0, 3.0));
    }

    #[test]
    fn nested_squares_contain_by_parity() {
        let outer = Path::polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]);
        let inner = Path::polygon(vec![
            Point2::new(3.0, 3.0),
            Point2::new(7.0, 3.0),
            Point2::new(7.0, 7.0),
            Point2::new(3.0, 7.0),
        ]);
        let c = ComplexPolygon::new(vec![outer, inner]);
        assert!(c.contains(&Point2::new(1.0, 1.0)));
        assert!(!c.contains(&Point2::new(5.0, 5.0)));
    }

    #[test]
    fn from_shapes_flattens_nested_composites() {
        let inner = ComplexPolygon::new(vec![square(0.0, 1.0), square(5.0, 1.0)]);
        let c = ComplexPolygon::from_shapes(vec![inner.into(), square(9.0, 1.0).into()]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.path_type(), PathType::Closed);
    }

    #[test]
    fn mixed_path_type() {
        let c = ComplexPolygon::new(vec![
            square(0.0, 1.0),
            Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]),
        ]);
        assert_eq!(c.path_type(), PathType::Mixed);
        assert!((c.length() - 5.0).abs() < 1e-9);
    }
}

use super::complex_polygon::ComplexPolygon;
use super::flattened_path::SegmentInfo;
use super::path::Path;
use crate::math::{Bounds, Matrix3, Point2, Vector2};
use crate::operations::boolean::FillRule;

/// Whether a shape's figures are open, closed or a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    Open,
    Closed,
    Mixed,
}

/// A flattened figure: its simplified points and whether it is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePath {
    pub points: Vec<Point2>,
    pub closed: bool,
}

/// Any drawable figure: a single path or a composite of paths.
#[derive(Debug, Clone)]
pub enum Shape {
    Path(Path),
    Complex(ComplexPolygon),
}

impl Shape {
    /// Returns every figure as a flattened polyline.
    #[must_use]
    pub fn flatten(&self) -> Vec<SimplePath> {
        self.paths()
            .iter()
            .map(|p| SimplePath {
                points: p.points(),
                closed: p.is_closed(),
            })
            .collect()
    }

    /// Returns the paths that make up the shape.
    #[must_use]
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            Self::Path(p) => vec![p],
            Self::Complex(c) => c.paths().iter().collect(),
        }
    }

    #[must_use]
    pub fn path_type(&self) -> PathType {
        match self {
            Self::Path(p) if p.is_closed() => PathType::Closed,
            Self::Path(_) => PathType::Open,
            Self::Complex(c) => c.path_type(),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Path(p) => p.bounds(),
            Self::Complex(c) => c.bounds(),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Path(p) => p.length(),
            Self::Complex(c) => c.length(),
        }
    }

    /// Even-odd containment across all figures.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        match self {
            Self::Path(p) => p.contains(point),
            Self::Complex(c) => c.contains(point),
        }
    }

    #[must_use]
    pub fn point_along_path(&self, distance: f64) -> SegmentInfo {
        match self {
            Self::Path(p) => p.point_along_path(distance),
            Self::Complex(c) => c.point_along_path(distance),
        }
    }

    /// Points where the segment `start`-`end` crosses the shape's figures,
    /// nearest to `start` first.
    #[must_use]
    pub fn find_intersections(&self, start: Point2, end: Point2, fill_rule: FillRule) -> Vec<Point2> {
        match self {
            Self::Path(p) => p.find_intersections(start, end, fill_rule),
            Self::Complex(c) => c.find_intersections(start, end, fill_rule),
        }
    }

    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        match self {
            Self::Path(p) => Self::Path(p.transform(matrix)),
            Self::Complex(c) => Self::Complex(c.transform(matrix)),
        }
    }

    #[must_use]
    pub fn translate(&self, offset: Vector2) -> Self {
        self.transform(&Matrix3::new_translation(&offset))
    }

    /// Scales about the center of the bounds.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        let center = self.bounds().center();
        let m = Matrix3::new_translation(&center.coords)
            * Matrix3::new_scaling(factor)
            * Matrix3::new_translation(&-center.coords);
        self.transform(&m)
    }

    /// Rotates by `radians` about the center of the bounds.
    #[must_use]
    pub fn rotate(&self, radians: f64) -> Self {
        let center = self.bounds().center();
        let m = Matrix3::new_translation(&center.coords)
            * Matrix3::new_rotation(radians)
            * Matrix3::new_translation(&-center.coords);
        self.transform(&m)
    }

    /// Closes every open figure.
    #[must_use]
    pub fn as_closed_path(&self) -> Self {
        match self {
            Self::Path(p) => Self::Path(p.as_closed_path()),
            Self::Complex(c) => Self::Complex(c.as_closed_path()),
        }
    }
}

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Self::Path(path)
    }
}

impl From<ComplexPolygon> for Shape {
    fn from(polygon: ComplexPolygon) -> Self {
        Self::Complex(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Path {
        Path::polygon(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
    }

    #[test]
    fn intersections_forward_to_the_path() {
        let shape: Shape = square(0.0, 0.0, 10.0).into();
        let hits = shape.find_intersections(Point2::new(5.0, -5.0), Point2::new(5.0, 20.0), FillRule::NonZero);
        assert_eq!(hits, vec![Point2::new(5.0, 0.0), Point2::new(5.0, 10.0)]);
    }

    #[test]
    fn path_type_reflects_figures() {
        let closed: Shape = square(0.0, 0.0, 1.0).into();
        assert_eq!(closed.path_type(), PathType::Closed);
        let open: Shape = Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).into();
        assert_eq!(open.path_type(), PathType::Open);
        assert_eq!(open.as_closed_path().path_type(), PathType::Closed);
    }

    #[test]
    fn scale_keeps_center() {
        let shape: Shape = square(0.0, 0.0, 10.0).into();
        let scaled = shape.scale(2.0);
        let b = scaled.bounds();
        assert!((b.min.x + 5.0).abs() < 1e-9);
        assert!((b.max.x - 15.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_quarter_turn_keeps_square_bounds() {
        let shape: Shape = square(0.0, 0.0, 10.0).into();
        let b = shape.rotate(std::f64::consts::FRAC_PI_2).bounds();
        assert!(b.min.x.abs() < 1e-9 && (b.max.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn flatten_reports_closed_flag() {
        let shape: Shape = square(0.0, 0.0, 2.0).into();
        let flat = shape.flatten();
        assert_eq!(flat.len(), 1);
        assert!(flat[0].closed);
        assert_eq!(flat[0].points.len(), 4);
    }
}

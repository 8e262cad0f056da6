use crate::error::Result;
use crate::geometry::{
    ArcSegment, ComplexPolygon, CubicBezierSegment, LineSegment, LinearSegment, Path, Shape,
};
use crate::math::{Matrix3, Point2, Vector2};

/// Imperative path construction with a transform stack.
///
/// Points given to the builder are in user space; every emitted segment is
/// mapped through the current transform (the user transform composed with
/// the builder's default transform). The current point is kept in output
/// space.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    figures: Vec<Figure>,
    default_transform: Matrix3,
    set_transform: Matrix3,
    current_transform: Matrix3,
    current_point: Point2,
}

#[derive(Debug, Clone, Default)]
struct Figure {
    segments: Vec<LineSegment>,
    closed: bool,
}

impl Figure {
    fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn build(&self) -> Path {
        Path::with_closed(self.segments.clone(), self.closed)
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_transform(Matrix3::identity())
    }

    /// Creates a builder whose output is always mapped through `transform`.
    #[must_use]
    pub fn with_default_transform(transform: Matrix3) -> Self {
        Self {
            figures: vec![Figure::default()],
            default_transform: transform,
            set_transform: Matrix3::identity(),
            current_transform: transform,
            current_point: Point2::origin(),
        }
    }

    /// Replaces the user transform.
    pub fn set_transform(&mut self, transform: Matrix3) -> &mut Self {
        self.set_transform = transform;
        self.update_transform();
        self
    }

    /// Sets the translation part of the user transform.
    pub fn set_origin(&mut self, origin: Point2) -> &mut Self {
        self.set_transform[(0, 2)] = origin.x;
        self.set_transform[(1, 2)] = origin.y;
        self.update_transform();
        self
    }

    pub fn reset_transform(&mut self) -> &mut Self {
        self.set_transform = Matrix3::identity();
        self.update_transform();
        self
    }

    pub fn reset_origin(&mut self) -> &mut Self {
        self.set_origin(Point2::origin())
    }

    fn update_transform(&mut self) {
        self.current_transform = self.default_transform * self.set_transform;
    }

    fn map(&self, point: &Point2) -> Point2 {
        self.current_transform.transform_point(point)
    }

    fn current(&mut self) -> &mut Figure {
        if self.figures.is_empty() {
            self.figures.push(Figure::default());
        }
        let last = self.figures.len() - 1;
        &mut self.figures[last]
    }

    /// Appends a segment that is already in output space.
    fn push(&mut self, segment: LineSegment) -> &mut Self {
        self.current_point = segment.end_point();
        self.current().segments.push(segment);
        self
    }

    /// Starts a new figure at `point`.
    pub fn move_to(&mut self, point: Point2) -> &mut Self {
        self.start_figure();
        self.current_point = self.map(&point);
        self
    }

    pub fn line_to(&mut self, point: Point2) -> &mut Self {
        let end = self.map(&point);
        self.push(LinearSegment::new(self.current_point, end).into())
    }

    pub fn add_line(&mut self, start: Point2, end: Point2) -> &mut Self {
        self.add_segment(LinearSegment::new(start, end).into())
    }

    /// Adds a polyline through `points`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for fewer than two points.
    pub fn add_lines(&mut self, points: Vec<Point2>) -> Result<&mut Self> {
        let segment = LinearSegment::from_points(points)?;
        Ok(self.add_segment(segment.into()))
    }

    /// Adds a user-space segment, transforming it first.
    pub fn add_segment(&mut self, segment: LineSegment) -> &mut Self {
        let segment = segment.transform(&self.current_transform);
        self.push(segment)
    }

    /// Quadratic curve from the current point, elevated to a cubic.
    pub fn quadratic_bezier_to(&mut self, control: Point2, end: Point2) -> &mut Self {
        let (c, e) = (self.map(&control), self.map(&end));
        let (c1, c2) = elevate_quadratic(&self.current_point, &c, &e);
        self.push(CubicBezierSegment::single(self.current_point, c1, c2, e).into())
    }

    pub fn cubic_bezier_to(&mut self, control1: Point2, control2: Point2, end: Point2) -> &mut Self {
        let segment = CubicBezierSegment::single(
            self.current_point,
            self.map(&control1),
            self.map(&control2),
            self.map(&end),
        );
        self.push(segment.into())
    }

    pub fn add_quadratic_bezier(&mut self, start: Point2, control: Point2, end: Point2) -> &mut Self {
        let (c1, c2) = elevate_quadratic(&start, &control, &end);
        self.add_cubic_bezier(start, c1, c2, end)
    }

    pub fn add_cubic_bezier(
        &mut self,
        start: Point2,
        control1: Point2,
        control2: Point2,
        end: Point2,
    ) -> &mut Self {
        self.add_segment(CubicBezierSegment::single(start, control1, control2, end).into())
    }

    /// SVG-style arc from the current point to `end`.
    ///
    /// The arc is constructed in user space and then transformed, so
    /// non-uniform scales shear the ellipse correctly. A singular transform
    /// degrades to a straight line.
    pub fn arc_to(
        &mut self,
        radii: Vector2,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point2,
    ) -> &mut Self {
        let Some(inverse) = self.current_transform.try_inverse() else {
            return self.line_to(end);
        };
        let start = inverse.transform_point(&self.current_point);
        self.add_arc_endpoints(start, end, radii, rotation, large_arc, sweep)
    }

    pub fn add_arc_endpoints(
        &mut self,
        start: Point2,
        end: Point2,
        radii: Vector2,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> &mut Self {
        let arc = ArcSegment::from_endpoints(start, end, radii, rotation, large_arc, sweep);
        self.add_segment(arc.into())
    }

    /// Center-form arc; angles in degrees.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonPositive` if either radius is not positive.
    pub fn add_arc(
        &mut self,
        center: Point2,
        radii: Vector2,
        rotation: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Result<&mut Self> {
        let arc = ArcSegment::from_center(center, radii, rotation, start_angle, sweep_angle)?;
        Ok(self.add_segment(arc.into()))
    }

    /// Begins a new figure unless the current one is still empty.
    pub fn start_figure(&mut self) -> &mut Self {
        let figure = self.current();
        if figure.is_empty() {
            figure.closed = false;
        } else {
            self.figures.push(Figure::default());
        }
        self
    }

    pub fn close_figure(&mut self) -> &mut Self {
        self.current().closed = true;
        self.start_figure()
    }

    pub fn close_all_figures(&mut self) -> &mut Self {
        for figure in &mut self.figures {
            figure.closed = true;
        }
        self.close_figure()
    }

    /// One non-empty figure builds a [`Path`]; anything else builds a
    /// [`ComplexPolygon`].
    #[must_use]
    pub fn build(&self) -> Shape {
        let mut paths: Vec<Path> = self
            .figures
            .iter()
            .filter(|f| !f.is_empty())
            .map(Figure::build)
            .collect();
        if paths.len() == 1 {
            if let Some(path) = paths.pop() {
                return Shape::Path(path);
            }
        }
        Shape::Complex(ComplexPolygon::new(paths))
    }

    /// Clears all figures, the user transform and the current point.
    pub fn reset(&mut self) -> &mut Self {
        self.clear();
        self.reset_transform();
        self.current_point = Point2::origin();
        self
    }

    /// Clears all figures; transforms and the current point are kept.
    pub fn clear(&mut self) -> &mut Self {
        self.figures.clear();
        self.figures.push(Figure::default());
        self
    }

    /// Current point in output space.
    #[must_use]
    pub fn current_point(&self) -> Point2 {
        self.current_point
    }
}

/// Degree elevation: a quadratic's control point becomes two cubic handles.
fn elevate_quadratic(start: &Point2, control: &Point2, end: &Point2) -> (Point2, Point2) {
    let c1 = start + (control - start) * (2.0 / 3.0);
    let c2 = end + (control - end) * (2.0 / 3.0);
    (c1, c2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::PathType;

    fn triangle(builder: &mut PathBuilder) {
        builder
            .move_to(Point2::new(0.0, 0.0))
            .line_to(Point2::new(10.0, 0.0))
            .line_to(Point2::new(10.0, 10.0))
            .close_figure();
    }

    #[test]
    fn single_figure_builds_a_path() {
        let mut builder = PathBuilder::new();
        triangle(&mut builder);
        let shape = builder.build();
        assert!(matches!(shape, Shape::Path(_)));
        assert_eq!(shape.path_type(), PathType::Closed);
        assert_eq!(
            shape.flatten()[0].points,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0)
            ]
        );
    }

    #[test]
    fn two_figures_build_a_complex_polygon() {
        let mut builder = PathBuilder::new();
        triangle(&mut builder);
        builder
            .move_to(Point2::new(20.0, 0.0))
            .line_to(Point2::new(30.0, 0.0));
        let shape = builder.build();
        match shape {
            Shape::Complex(c) => {
                assert_eq!(c.len(), 2);
                assert_eq!(c.path_type(), PathType::Mixed);
            }
            Shape::Path(_) => panic!("expected a complex polygon"),
        }
    }

    #[test]
    fn empty_figure_only_resets_closed_flag() {
        let mut builder = PathBuilder::new();
        builder.close_figure().start_figure();
        builder.line_to(Point2::new(5.0, 0.0));
        let shape = builder.build();
        assert_eq!(shape.path_type(), PathType::Open);
        assert_eq!(shape.paths().len(), 1);
    }

    #[test]
    fn origin_translates_points_once() {
        let mut builder = PathBuilder::new();
        builder.set_origin(Point2::new(100.0, 50.0));
        builder
            .move_to(Point2::new(0.0, 0.0))
            .line_to(Point2::new(10.0, 0.0))
            .line_to(Point2::new(10.0, 10.0));
        let points = &builder.build().flatten()[0].points;
        assert_eq!(points[0], Point2::new(100.0, 50.0));
        assert_eq!(points[2], Point2::new(110.0, 60.0));
    }

    #[test]
    fn user_transform_composes_with_default() {
        let mut builder =
            PathBuilder::with_default_transform(Matrix3::new_translation(&Vector2::new(1.0, 0.0)));
        builder.set_transform(Matrix3::new_scaling(2.0));
        builder.add_line(Point2::new(1.0, 1.0), Point2::new(2.0, 1.0));
        let points = &builder.build().flatten()[0].points;
        assert_eq!(points[0], Point2::new(3.0, 2.0));
        assert_eq!(points[1], Point2::new(5.0, 2.0));
    }

    #[test]
    fn quadratic_is_elevated() {
        let (c1, c2) = elevate_quadratic(
            &Point2::new(0.0, 0.0),
            &Point2::new(3.0, 3.0),
            &Point2::new(6.0, 0.0),
        );
        assert_eq!(c1, Point2::new(2.0, 2.0));
        assert_eq!(c2, Point2::new(4.0, 2.0));
    }

    #[test]
    fn arc_to_ends_at_target() {
        let mut builder = PathBuilder::new();
        builder
            .move_to(Point2::new(0.0, 0.0))
            .arc_to(Vector2::new(5.0, 5.0), 0.0, false, true, Point2::new(10.0, 0.0));
        let end = builder.current_point();
        assert!((end - Point2::new(10.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn close_all_figures_closes_earlier_ones() {
        let mut builder = PathBuilder::new();
        builder
            .move_to(Point2::new(0.0, 0.0))
            .line_to(Point2::new(1.0, 0.0))
            .line_to(Point2::new(1.0, 1.0));
        builder
            .move_to(Point2::new(5.0, 0.0))
            .line_to(Point2::new(6.0, 0.0))
            .line_to(Point2::new(6.0, 1.0));
        builder.close_all_figures();
        assert_eq!(builder.build().path_type(), PathType::Closed);
    }

    #[test]
    fn add_arc_rejects_bad_radius() {
        let mut builder = PathBuilder::new();
        assert!(builder
            .add_arc(Point2::origin(), Vector2::new(-1.0, 1.0), 0.0, 0.0, 90.0)
            .is_err());
        builder.reset();
        assert!(matches!(builder.build(), Shape::Complex(c) if c.is_empty()));
    }
}

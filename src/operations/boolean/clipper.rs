use tracing::trace;

use super::engine::{ClipEngine, ClipSolution};
use super::select::{ClipOperation, FillRule, PathRole};
use crate::error::{ClipperError, OperationError, Result};
use crate::geometry::{ComplexPolygon, Path, Shape};
use crate::math::Point2;

/// Input coordinates are multiplied by this before clipping so the engine's
/// coincidence and sliver tolerances stay well below drawing precision. The
/// offsetter builds its contours in the same space.
pub(crate) const CLIPPER_SCALE: f64 = 1000.0;

/// Options controlling the clipper's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipperOptions {
    /// Keep collinear vertices instead of merging the edges around them.
    pub preserve_collinear: bool,
    /// Emit closed contours with negative orientation.
    pub reverse_solution: bool,
}

impl Default for ClipperOptions {
    fn default() -> Self {
        Self {
            preserve_collinear: true,
            reverse_solution: false,
        }
    }
}

/// Boolean clipper over closed polygons and open polylines.
///
/// Paths are registered as subject or clip, then [`Clipper::execute`] runs
/// the sweep. Registered paths stay until [`Clipper::clear`], so the same
/// input can be clipped with several operations.
///
/// ```
/// use vectis::math::Point2;
/// use vectis::operations::boolean::{ClipOperation, Clipper, FillRule, PathRole};
///
/// let a = [
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 10.0),
///     Point2::new(0.0, 10.0),
/// ];
/// let b: Vec<Point2> = a.iter().map(|p| Point2::new(p.x + 5.0, p.y)).collect();
///
/// let mut clipper = Clipper::new();
/// clipper.add_path(&a, PathRole::Subject).unwrap();
/// clipper.add_path(&b, PathRole::Clip).unwrap();
/// let solution = clipper.execute(ClipOperation::Union, FillRule::NonZero).unwrap();
/// assert_eq!(solution.closed.len(), 1);
/// ```
#[derive(Debug)]
pub struct Clipper {
    engine: ClipEngine,
    path_count: usize,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ClipperOptions::default())
    }

    #[must_use]
    pub fn with_options(options: ClipperOptions) -> Self {
        Self {
            engine: ClipEngine::new(options.preserve_collinear, options.reverse_solution),
            path_count: 0,
        }
    }

    /// Registers a closed polygon. The first point need not be repeated.
    ///
    /// # Errors
    ///
    /// Returns `ClipperError::NonFinite` if any coordinate is NaN or infinite.
    pub fn add_path(&mut self, points: &[Point2], role: PathRole) -> std::result::Result<(), ClipperError> {
        self.add(points, role, false)
    }

    /// Registers an open polyline. Open paths are clipped against the closed
    /// regions and returned separately.
    ///
    /// # Errors
    ///
    /// Returns `ClipperError::NonFinite` if any coordinate is NaN or infinite.
    pub fn add_open_path(
        &mut self,
        points: &[Point2],
        role: PathRole,
    ) -> std::result::Result<(), ClipperError> {
        self.add(points, role, true)
    }

    /// Flattens a shape and registers each of its figures, open figures as
    /// polylines.
    ///
    /// # Errors
    ///
    /// Returns `ClipperError::NonFinite` if any coordinate is NaN or infinite.
    pub fn add_shape(&mut self, shape: &Shape, role: PathRole) -> std::result::Result<(), ClipperError> {
        for figure in shape.flatten() {
            self.add(&figure.points, role, !figure.closed)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ClipperError::NonFinite` if any coordinate is NaN or infinite.
    pub fn add_shapes<'a>(
        &mut self,
        shapes: impl IntoIterator<Item = &'a Shape>,
        role: PathRole,
    ) -> std::result::Result<(), ClipperError> {
        shapes.into_iter().try_for_each(|s| self.add_shape(s, role))
    }

    fn add(&mut self, points: &[Point2], role: PathRole, is_open: bool) -> std::result::Result<(), ClipperError> {
        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(ClipperError::NonFinite);
        }
        let scaled: Vec<Point2> = points.iter().map(|p| Point2::from(p.coords * CLIPPER_SCALE)).collect();
        self.engine.add_path(&scaled, role, is_open);
        self.path_count += 1;
        Ok(())
    }

    /// Number of paths registered so far.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Runs the operation over the registered paths.
    ///
    /// # Errors
    ///
    /// Returns `ClipperError::InvariantViolated` if the sweep reaches an
    /// inconsistent state.
    pub fn execute(
        &mut self,
        operation: ClipOperation,
        fill_rule: FillRule,
    ) -> std::result::Result<ClipSolution, ClipperError> {
        trace!(paths = self.path_count, minima = self.engine.minima_count(), "clipping");
        let solution = self.engine.execute(operation, fill_rule)?;
        let unscale = |paths: Vec<Vec<Point2>>| -> Vec<Vec<Point2>> {
            paths
                .into_iter()
                .map(|path| path.into_iter().map(|p| Point2::from(p.coords / CLIPPER_SCALE)).collect())
                .collect()
        };
        Ok(ClipSolution {
            closed: unscale(solution.closed),
            open: unscale(solution.open),
        })
    }

    /// Runs the operation and returns closed contours as polygons followed
    /// by open results as polylines.
    ///
    /// # Errors
    ///
    /// Returns `ClipperError::InvariantViolated` if the sweep reaches an
    /// inconsistent state.
    pub fn execute_paths(
        &mut self,
        operation: ClipOperation,
        fill_rule: FillRule,
    ) -> std::result::Result<Vec<Path>, ClipperError> {
        let solution = self.execute(operation, fill_rule)?;
        let closed = solution
            .closed
            .into_iter()
            .map(|points| Path::polygon(points).preserving_points());
        let open = solution
            .open
            .into_iter()
            .map(|points| Path::polyline(points).preserving_points());
        Ok(closed.chain(open).collect())
    }

    /// Forgets every registered path.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.path_count = 0;
    }
}

/// Clips `subject` shapes against `clip` shapes and returns the resulting
/// paths.
pub(super) fn boolean_execute(
    subject: &[Shape],
    clip: &[Shape],
    operation: ClipOperation,
    fill_rule: FillRule,
) -> Result<Vec<Path>> {
    let mut clipper = Clipper::new();
    clipper
        .add_shapes(subject, PathRole::Subject)
        .and_then(|()| clipper.add_shapes(clip, PathRole::Clip))
        .and_then(|()| clipper.execute_paths(operation, fill_rule))
        .map_err(|e| OperationError::ClipFailed(e).into())
}

impl Shape {
    /// Cuts `holes` out of the shape using the even-odd rule.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ClipFailed` if the clipper fails.
    pub fn clip(&self, holes: &[Shape]) -> Result<ComplexPolygon> {
        self.clip_with(holes, ClipOperation::Difference, FillRule::EvenOdd)
    }

    /// Combines the shape with `others` and collects the result.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ClipFailed` if the clipper fails.
    pub fn clip_with(&self, others: &[Shape], operation: ClipOperation, fill_rule: FillRule) -> Result<ComplexPolygon> {
        boolean_execute(std::slice::from_ref(self), others, operation, fill_rule).map(ComplexPolygon::new)
    }
}

use tracing::debug;

use super::options::{EndCapStyle, JointStyle, OffsetOptions};
use super::raw_offset::GroupOffsetter;
use crate::error::{ClipperError, OperationError, Result};
use crate::geometry::{Path, Shape};
use crate::math::polygon_2d::{signed_area, strip_duplicates};
use crate::math::Point2;
use crate::operations::boolean::{ClipOperation, Clipper, ClipperOptions, FillRule, PathRole, CLIPPER_SCALE};

/// Scaled offsets below this magnitude return the input unchanged.
const MIN_DELTA: f64 = 0.5;

/// Paths offset together with one joint style and end cap.
#[derive(Debug)]
struct PathGroup {
    paths: Vec<Vec<Point2>>,
    joint_style: JointStyle,
    end_cap: EndCapStyle,
    /// Set for polygon groups whose outer rings run clockwise.
    reversed: bool,
}

impl PathGroup {
    fn new(paths: Vec<Vec<Point2>>, joint_style: JointStyle, end_cap: EndCapStyle) -> Self {
        let is_closed = end_cap.is_closed();
        let paths: Vec<Vec<Point2>> = paths
            .iter()
            .map(|p| strip_duplicates(p, is_closed))
            .filter(|p| !p.is_empty())
            .collect();
        let reversed = end_cap == EndCapStyle::Polygon
            && lowest_path(&paths).is_some_and(|i| signed_area(&paths[i]) < 0.0);
        Self {
            paths,
            joint_style,
            end_cap,
            reversed,
        }
    }
}

/// Index of the path holding the vertex with the greatest y, the left-most
/// one on ties. That path is always an outer ring, so it fixes the
/// orientation of the group.
#[allow(clippy::float_cmp)]
fn lowest_path(paths: &[Vec<Point2>]) -> Option<usize> {
    let mut best: Option<(usize, Point2)> = None;
    for (i, path) in paths.iter().enumerate() {
        if path.len() < 3 {
            continue;
        }
        for pt in path {
            let lower = best.is_none_or(|(_, b)| pt.y > b.y || (pt.y == b.y && pt.x < b.x));
            if lower {
                best = Some((i, *pt));
            }
        }
    }
    best.map(|(i, _)| i)
}

fn to_scaled(path: &[Point2]) -> Vec<Point2> {
    path.iter().map(|p| Point2::from(p.coords * CLIPPER_SCALE)).collect()
}

fn from_scaled(path: Vec<Point2>) -> Vec<Point2> {
    path.into_iter().map(|p| Point2::from(p.coords / CLIPPER_SCALE)).collect()
}

/// Inflates or deflates polygons and strokes polylines.
///
/// Paths are added in groups sharing a joint style and end cap. Each vertex
/// is offset independently and the raw contours are then unioned, which
/// removes the overlaps the per-vertex construction leaves at concave
/// corners.
///
/// ```
/// use vectis::math::Point2;
/// use vectis::operations::offset::{JointStyle, OffsetOptions, PolygonOffsetter};
///
/// let square = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 10.0),
///     Point2::new(0.0, 10.0),
/// ];
/// let options = OffsetOptions {
///     joint_style: JointStyle::Miter,
///     ..OffsetOptions::default()
/// };
/// let mut offsetter = PolygonOffsetter::new(options);
/// offsetter.add_path(square);
/// let grown = offsetter.execute(1.0).unwrap();
/// assert_eq!(grown.len(), 1);
/// assert!((grown[0].bounds().width() - 12.0).abs() < 1e-9);
/// ```
#[derive(Debug, Default)]
pub struct PolygonOffsetter {
    options: OffsetOptions,
    groups: Vec<PathGroup>,
}

impl PolygonOffsetter {
    #[must_use]
    pub fn new(options: OffsetOptions) -> Self {
        Self {
            options,
            groups: Vec::new(),
        }
    }

    /// Adds one path using the configured joint style and end cap.
    pub fn add_path(&mut self, points: Vec<Point2>) {
        self.add_paths(vec![points], self.options.joint_style, self.options.end_cap);
    }

    /// Adds a group of paths sharing a joint style and end cap.
    pub fn add_paths(&mut self, paths: Vec<Vec<Point2>>, joint_style: JointStyle, end_cap: EndCapStyle) {
        if paths.is_empty() {
            return;
        }
        self.groups.push(PathGroup::new(paths, joint_style, end_cap));
    }

    /// Flattens a shape and adds its figures.
    ///
    /// Closed figures keep the configured end cap when it is a closed style
    /// and otherwise become polygons. Open figures keep an open end cap and
    /// otherwise get butt ends.
    pub fn add_shape(&mut self, shape: &Shape) {
        let configured = self.options.end_cap;
        let (mut closed, mut open) = (Vec::new(), Vec::new());
        for figure in shape.flatten() {
            if figure.closed {
                closed.push(figure.points);
            } else {
                open.push(figure.points);
            }
        }
        let closed_cap = if configured.is_closed() { configured } else { EndCapStyle::Polygon };
        let open_cap = if configured.is_closed() { EndCapStyle::Butt } else { configured };
        self.add_paths(closed, self.options.joint_style, closed_cap);
        self.add_paths(open, self.options.joint_style, open_cap);
    }

    /// Number of path groups added so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Offsets every added path by `delta` and returns the cleaned contours.
    ///
    /// Positive deltas grow polygons regardless of their orientation. Open
    /// paths are stroked to a total width of `|delta|`. Output keeps the
    /// orientation of the input polygons.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `delta` is not finite and
    /// `OperationError::OffsetFailed` if the input has non-finite points or
    /// the offset collapses to nothing.
    pub fn execute(&self, delta: f64) -> Result<Vec<Path>> {
        if !delta.is_finite() {
            return Err(OperationError::InvalidInput(format!("offset delta must be finite, got {delta}")).into());
        }
        if self.groups.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            delta,
            joint_style = ?self.options.joint_style,
            end_cap = ?self.options.end_cap,
            groups = self.groups.len(),
            "offsetting paths"
        );

        self.offset_and_union(delta)
            .map(|contours| {
                contours
                    .into_iter()
                    .map(|points| Path::polygon(points).preserving_points())
                    .collect()
            })
            .map_err(|e| OperationError::OffsetFailed(e).into())
    }

    fn offset_and_union(&self, delta: f64) -> std::result::Result<Vec<Vec<Point2>>, ClipperError> {
        let raw = self.raw_contours(delta);
        let reversed = self
            .groups
            .iter()
            .find(|g| g.end_cap == EndCapStyle::Polygon)
            .is_some_and(|g| g.reversed);
        let mut clipper = Clipper::with_options(ClipperOptions {
            preserve_collinear: self.options.preserve_collinear,
            reverse_solution: self.options.reverse_solution != reversed,
        });
        for contour in &raw {
            clipper.add_path(contour, PathRole::Subject)?;
        }
        let fill_rule = if reversed { FillRule::Negative } else { FillRule::Positive };
        let solution = clipper.execute(ClipOperation::Union, fill_rule)?;
        if solution.closed.is_empty() {
            return Err(ClipperError::EmptyResult);
        }
        Ok(solution.closed)
    }

    /// Builds the per-vertex contours in the clipper's scaled space and
    /// returns them in user units.
    fn raw_contours(&self, delta: f64) -> Vec<Vec<Point2>> {
        let delta = delta * CLIPPER_SCALE;
        if delta.abs() < MIN_DELTA {
            return self.groups.iter().flat_map(|g| g.paths.iter().cloned()).collect();
        }

        let mut contours = Vec::new();
        for group in &self.groups {
            let group_delta = match group.end_cap {
                EndCapStyle::Polygon if group.reversed => -delta,
                EndCapStyle::Polygon => delta,
                _ => delta.abs() * 0.5,
            };
            let mut offsetter = GroupOffsetter::new(
                group_delta,
                group.joint_style,
                group.end_cap,
                self.options.miter_limit,
                self.options.arc_tolerance * CLIPPER_SCALE,
            );
            for path in &group.paths {
                contours.extend(offsetter.offset_path(&to_scaled(path)).into_iter().map(from_scaled));
            }
        }
        contours
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::VectisError;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    fn area(paths: &[Path]) -> f64 {
        paths.iter().map(|p| signed_area(&p.points())).sum()
    }

    fn miter() -> OffsetOptions {
        OffsetOptions {
            joint_style: JointStyle::Miter,
            ..OffsetOptions::default()
        }
    }

    #[test]
    fn lowest_path_ignores_degenerate_paths() {
        let paths = vec![vec![Point2::new(-10.0, 0.0)], square(5.0, 0.0, 1.0), square(0.0, 0.0, 1.0)];
        assert_eq!(lowest_path(&paths), Some(2));
        assert_eq!(lowest_path(&[]), None);
    }

    #[test]
    fn lowest_path_prefers_greatest_y() {
        let paths = vec![square(0.0, 0.0, 1.0), square(5.0, 0.0, 3.0)];
        assert_eq!(lowest_path(&paths), Some(1));
    }

    #[test]
    fn inflate_and_deflate_square() {
        let mut offsetter = PolygonOffsetter::new(miter());
        offsetter.add_path(square(0.0, 0.0, 10.0));
        assert_abs_diff_eq!(area(&offsetter.execute(2.0).unwrap()), 196.0, epsilon = 1e-6);
        assert_abs_diff_eq!(area(&offsetter.execute(-2.0).unwrap()), 36.0, epsilon = 1e-6);
    }

    #[test]
    fn clockwise_input_keeps_its_orientation() {
        let mut cw = square(0.0, 0.0, 10.0);
        cw.reverse();
        let mut offsetter = PolygonOffsetter::new(miter());
        offsetter.add_path(cw);
        let out = offsetter.execute(1.0).unwrap();
        assert_abs_diff_eq!(area(&out), -144.0, epsilon = 1e-6);
    }

    #[test]
    fn small_delta_returns_input() {
        let mut offsetter = PolygonOffsetter::new(OffsetOptions::default());
        offsetter.add_path(square(0.0, 0.0, 10.0));
        let out = offsetter.execute(0.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(area(&out), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn sub_unit_offsets_are_applied() {
        let mut offsetter = PolygonOffsetter::new(miter());
        offsetter.add_path(square(0.0, 0.0, 10.0));
        assert_abs_diff_eq!(area(&offsetter.execute(0.4).unwrap()), 10.8 * 10.8, epsilon = 1e-6);
        assert_abs_diff_eq!(area(&offsetter.execute(-0.4).unwrap()), 9.2 * 9.2, epsilon = 1e-6);
        assert_abs_diff_eq!(area(&offsetter.execute(0.49).unwrap()), 10.98 * 10.98, epsilon = 1e-6);
        // Below half a scaled unit the input comes back as is.
        assert_abs_diff_eq!(area(&offsetter.execute(0.0004).unwrap()), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn thin_open_paths_are_stroked() {
        let mut offsetter = PolygonOffsetter::new(OffsetOptions {
            end_cap: EndCapStyle::Butt,
            ..OffsetOptions::default()
        });
        offsetter.add_path(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        let out = offsetter.execute(0.4).unwrap();
        assert_abs_diff_eq!(area(&out), 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out[0].bounds().height(), 0.4, epsilon = 1e-9);
    }

    #[test]
    fn round_joints_track_the_exact_area() {
        let mut offsetter = PolygonOffsetter::new(OffsetOptions {
            joint_style: JointStyle::Round,
            ..OffsetOptions::default()
        });
        offsetter.add_path(square(0.0, 0.0, 10.0));
        let delta = 2.0;
        // Area plus perimeter times delta plus a full disc of radius delta.
        let exact = 100.0 + 40.0 * delta + std::f64::consts::PI * delta * delta;
        let got = area(&offsetter.execute(delta).unwrap());
        assert!(got <= exact + 1e-6, "got={got}");
        assert_abs_diff_eq!(got, exact, epsilon = 0.02);
    }

    #[test]
    fn holes_shrink_when_outer_grows() {
        let mut hole = square(3.0, 3.0, 4.0);
        hole.reverse();
        let mut offsetter = PolygonOffsetter::new(miter());
        offsetter.add_paths(vec![square(0.0, 0.0, 10.0), hole], JointStyle::Miter, EndCapStyle::Polygon);
        let out = offsetter.execute(1.0).unwrap();
        assert_eq!(out.len(), 2);
        // 12x12 outside, 2x2 hole.
        assert_abs_diff_eq!(area(&out), 140.0, epsilon = 1e-6);
    }

    #[test]
    fn concave_overlaps_are_resolved() {
        // An L shape whose inner corner would fold over when grown.
        let l = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let mut offsetter = PolygonOffsetter::new(miter());
        offsetter.add_path(l);
        let out = offsetter.execute(1.0).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].points().iter().all(|p| p.x >= -1.0 - 1e-9 && p.y >= -1.0 - 1e-9));
    }

    #[test]
    fn stroked_line_has_requested_width() {
        let mut offsetter = PolygonOffsetter::new(OffsetOptions {
            end_cap: EndCapStyle::Butt,
            ..OffsetOptions::default()
        });
        offsetter.add_path(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        let out = offsetter.execute(2.0).unwrap();
        assert_abs_diff_eq!(area(&out), 20.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out[0].bounds().height(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn collapse_is_an_error() {
        let mut offsetter = PolygonOffsetter::new(OffsetOptions::default());
        offsetter.add_path(square(0.0, 0.0, 4.0));
        let err = offsetter.execute(-3.0).unwrap_err();
        assert!(matches!(
            err,
            VectisError::Operation(OperationError::OffsetFailed(ClipperError::EmptyResult))
        ));
    }

    #[test]
    fn nan_delta_is_invalid() {
        let mut offsetter = PolygonOffsetter::new(OffsetOptions::default());
        offsetter.add_path(square(0.0, 0.0, 4.0));
        assert!(matches!(
            offsetter.execute(f64::NAN),
            Err(VectisError::Operation(OperationError::InvalidInput(_)))
        ));
    }

    #[test]
    fn nothing_added_gives_nothing() {
        let offsetter = PolygonOffsetter::new(OffsetOptions::default());
        assert!(offsetter.execute(3.0).unwrap().is_empty());
    }

    #[test]
    fn shapes_split_into_closed_and_open_groups() {
        let shape: Shape = crate::geometry::ComplexPolygon::new(vec![
            Path::polygon(square(0.0, 0.0, 10.0)),
            Path::polyline(vec![Point2::new(20.0, 0.0), Point2::new(30.0, 0.0)]),
        ])
        .into();
        let mut offsetter = PolygonOffsetter::new(miter());
        offsetter.add_shape(&shape);
        assert_eq!(offsetter.group_count(), 2);
        let out = offsetter.execute(2.0).unwrap();
        assert_eq!(out.len(), 2);
        offsetter.clear();
        assert_eq!(offsetter.group_count(), 0);
    }
}

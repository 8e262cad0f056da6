use crate::math::distance_2d::point_to_segment_dist_sqrd;
use crate::math::polygon_2d::point_in_polygon_even_odd;
use crate::math::{Bounds, Point2};
use crate::operations::boolean::FillRule;

/// Cross products below this are treated as collinear.
const COLLINEAR_EPSILON: f64 = 0.003;

/// Points closer than this are merged when simplifying closed rings.
const CLOSE_POINT_EPSILON: f64 = 0.2;

/// Turn direction at a vertex, measured from the previous kept vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOrientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Result of a closest-point query against a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointInfo {
    /// Arc length from the path start to `closest_point_on_path`.
    pub distance_along_path: f64,
    /// Distance from `search_point` to the path. Negative when the point lies
    /// inside a closed path.
    pub distance_from_path: f64,
    /// The query point.
    pub search_point: Point2,
    /// The nearest point on the path.
    pub closest_point_on_path: Point2,
}

/// A point located at some arc length along a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInfo {
    pub point: Point2,
    /// Direction of the containing edge, measured from its end back to its start.
    pub angle: f64,
}

#[derive(Debug, Clone, Copy)]
struct PointData {
    point: Point2,
    orientation: PointOrientation,
    /// Length of the edge arriving at this point.
    length: f64,
    /// Cumulative length from the first point.
    total_length: f64,
}

/// The cached, simplified polyline form of a path.
///
/// Collinear and near-duplicate points are removed (the figure never drops
/// below its first point). Each point records the turn direction, the length
/// of the incoming edge and the cumulative length.
#[derive(Debug, Clone)]
pub struct FlattenedPath {
    points: Vec<PointData>,
    closed: bool,
    bounds: Bounds,
    length: f64,
}

impl FlattenedPath {
    /// Simplifies `points` into a flattened path.
    ///
    /// With `remove_close_and_collinear`, collinear points are dropped, along
    /// with closing points that duplicate the first one. Without it every
    /// input vertex is kept.
    #[must_use]
    pub fn new(points: &[Point2], closed: bool, remove_close_and_collinear: bool) -> Self {
        let points = simplify(points, closed, remove_close_and_collinear);
        let raw: Vec<Point2> = points.iter().map(|p| p.point).collect();
        let bounds = if raw.is_empty() {
            Bounds::new(Point2::origin(), Point2::origin())
        } else {
            Bounds::from_points(&raw)
        };
        let length = points.iter().map(|p| p.length).sum();
        Self {
            points,
            closed,
            bounds,
            length,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Total length, including the closing edge of a closed path.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the simplified points.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        self.points.iter().map(|p| p.point).collect()
    }

    /// Returns the turn direction recorded for each point.
    #[must_use]
    pub fn orientations(&self) -> Vec<PointOrientation> {
        self.points.iter().map(|p| p.orientation).collect()
    }

    /// Finds the point on the path closest to `point`.
    #[must_use]
    pub fn distance_from_path(&self, point: &Point2) -> PointInfo {
        let n = self.points.len();
        let mut best = PointInfo {
            distance_along_path: 0.0,
            distance_from_path: f64::MAX,
            search_point: *point,
            closest_point_on_path: self.points.first().map_or(*point, |p| p.point),
        };
        if n == 0 {
            return best;
        }
        if n == 1 {
            best.distance_from_path = (point - self.points[0].point).norm();
            return best;
        }

        let edges = if self.closed { n } else { n - 1 };
        let mut best_sqrd = f64::MAX;
        for i in 0..edges {
            let a = self.points[i].point;
            let b = self.points[(i + 1) % n].point;
            let d = b - a;
            let len_sq = d.norm_squared();
            let t = if len_sq > 0.0 {
                ((point - a).dot(&d) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let on_line = a + d * t;
            let dist = (on_line - point).norm_squared();
            if dist < best_sqrd {
                best_sqrd = dist;
                best.closest_point_on_path = on_line;
                best.distance_along_path = self.points[i].total_length + (on_line - a).norm();
            }
        }
        best.distance_from_path = best_sqrd.sqrt();
        best
    }

    /// Returns `true` if `point` lies inside (or on the boundary of) a closed
    /// path. Open paths contain nothing.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        if !self.closed || self.points.len() < 3 || !self.bounds.contains(point) {
            return false;
        }
        let ring = self.points();
        let n = ring.len();
        let on_edge = (0..n).any(|i| {
            point_to_segment_dist_sqrd(point, &ring[i], &ring[(i + 1) % n])
                < COLLINEAR_EPSILON * COLLINEAR_EPSILON
        });
        on_edge || point_in_polygon_even_odd(point, &ring)
    }

    /// Locates the point at `distance` along the path, wrapping around the
    /// total length.
    #[must_use]
    pub fn point_along_path(&self, distance: f64) -> SegmentInfo {
        let n = self.points.len();
        if n < 2 || self.length <= 0.0 {
            return SegmentInfo {
                point: self.points.first().map_or_else(Point2::origin, |p| p.point),
                angle: 0.0,
            };
        }

        let mut remaining = distance.rem_euclid(self.length);
        let edges = if self.closed { n } else { n - 1 };
        for i in 0..edges {
            let next = (i + 1) % n;
            let edge_length = self.points[next].length;
            if remaining < edge_length {
                let t = remaining / edge_length;
                let a = self.points[i].point;
                let b = self.points[next].point;
                let diff = a - b;
                return SegmentInfo {
                    point: Point2::from(a.coords * (1.0 - t) + b.coords * t),
                    angle: diff.y.atan2(diff.x) % std::f64::consts::TAU,
                };
            }
            remaining -= edge_length;
        }

        let last = self.points[n - 1].point;
        let diff = self.points[n - 2].point - last;
        SegmentInfo {
            point: last,
            angle: diff.y.atan2(diff.x),
        }
    }

    /// Finds where the segment `start`-`end` crosses the path, ordered by
    /// distance from `start`.
    ///
    /// Infinite coordinates are pulled in to one unit outside the bounds, so
    /// a half-infinite ray can be cast. A touch at a vertex counts once, and
    /// a pass through a vertex where the path stays on one side is dropped.
    /// On closed paths `FillRule::NonZero` keeps only the crossings where
    /// the winding count leaves or returns to zero. Every other rule keeps
    /// all crossings.
    #[must_use]
    pub fn find_intersections(&self, start: Point2, end: Point2, fill_rule: FillRule) -> Vec<Point2> {
        let (start, end) = (clamp_to_bounds(start, &self.bounds), clamp_to_bounds(end, &self.bounds));
        let crossings = self.crossings(start, end);
        if fill_rule == FillRule::NonZero && self.closed {
            apply_non_zero(crossings)
        } else {
            crossings.into_iter().map(|(p, _)| p).collect()
        }
    }

    /// Crossings with the side of the line their edge starts on.
    fn crossings(&self, start: Point2, end: Point2) -> Vec<(Point2, PointOrientation)> {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        let corners = if self.closed { n } else { n - 1 };
        let pt = |i: usize| self.points[i % n].point;
        let sides: Vec<PointOrientation> = (0..n).map(|i| orientation(&start, &end, &pt(i))).collect();
        let target = (start, end);

        // Pass one: which edges may cross, and which collinear runs cancel
        // the crossing recorded before them.
        let mut may_cross = vec![false; corners];
        let mut cancels = vec![false; corners];
        let mut prev_side = sides[corners - 1];
        for i in 0..corners {
            let (side, next_side, after_side) = (sides[i], sides[(i + 1) % n], sides[(i + 2) % n]);
            let (a, b) = (pt(i), pt(i + 1));
            cancels[i] = side == PointOrientation::Collinear
                && next_side == PointOrientation::Collinear
                && after_side != prev_side
                && (self.closed || i > 0)
                && (on_segment(&target, &a) || on_segment(&target, &b));
            may_cross[i] = (side == PointOrientation::Collinear || side != next_side) && boxes_touch(&(a, b), &target);
            prev_side = side;
        }

        let mut hits: Vec<(Point2, PointOrientation)> = Vec::new();
        let mut last_hit = if self.closed && may_cross[corners - 1] {
            segment_crossing(&(pt(corners - 1), pt(corners)), &target)
        } else {
            None
        };
        for i in 0..corners {
            if cancels[i] {
                hits.pop();
                continue;
            }
            if !may_cross[i] {
                last_hit = None;
                continue;
            }
            let Some(hit) = segment_crossing(&(pt(i), pt(i + 1)), &target) else {
                last_hit = None;
                continue;
            };
            if last_hit.is_some_and(|last| near(&last, &hit)) {
                // The previous edge already hit this vertex.
                last_hit = None;
                let mut next = (i + 1) % n;
                let mut prev = (i + corners - 1) % corners;
                if within(&pt(next), &hit, COLLINEAR_EPSILON) {
                    next = i;
                }
                if within(&pt(prev), &hit, COLLINEAR_EPSILON) {
                    prev = i;
                }
                if sides[next] != sides[prev] {
                    continue;
                }
            }
            hits.push((hit, sides[i]));
            last_hit = Some(hit);
        }

        hits.sort_by(|a, b| (a.0 - start).norm_squared().total_cmp(&(b.0 - start).norm_squared()));
        hits
    }
}

/// Replaces infinite coordinates with a value one unit outside `bounds`.
pub(super) fn clamp_to_bounds(mut point: Point2, bounds: &Bounds) -> Point2 {
    if point.x.is_infinite() {
        point.x = if point.x > 0.0 { bounds.max.x + 1.0 } else { bounds.min.x - 1.0 };
    }
    if point.y.is_infinite() {
        point.y = if point.y > 0.0 { bounds.max.y + 1.0 } else { bounds.min.y - 1.0 };
    }
    point
}

/// Keeps the crossings where the running winding count leaves or returns
/// to zero.
fn apply_non_zero(crossings: Vec<(Point2, PointOrientation)>) -> Vec<Point2> {
    let mut kept = Vec::with_capacity(crossings.len());
    let mut winding = 0;
    let mut step = 0;
    for (point, side) in crossings {
        let outside = winding == 0;
        step = match side {
            PointOrientation::CounterClockwise => 1,
            PointOrientation::Clockwise => -1,
            PointOrientation::Collinear => -step,
        };
        winding += step;
        if outside || winding == 0 {
            kept.push(point);
        }
    }
    kept
}

fn within(a: &Point2, b: &Point2, epsilon: f64) -> bool {
    (a - b).norm_squared() < epsilon * epsilon
}

/// Whether `q` lies in the segment's bounding box, padded by the close-point
/// tolerance.
fn on_segment(seg: &(Point2, Point2), q: &Point2) -> bool {
    let (min, max) = (seg.0.inf(&seg.1), seg.0.sup(&seg.1));
    q.x - CLOSE_POINT_EPSILON <= max.x
        && q.x + CLOSE_POINT_EPSILON >= min.x
        && q.y - CLOSE_POINT_EPSILON <= max.y
        && q.y + CLOSE_POINT_EPSILON >= min.y
}

fn boxes_touch(edge: &(Point2, Point2), target: &(Point2, Point2)) -> bool {
    let (emin, emax) = (edge.0.inf(&edge.1), edge.0.sup(&edge.1));
    let (tmin, tmax) = (target.0.inf(&target.1), target.0.sup(&target.1));
    emin.x - COLLINEAR_EPSILON <= tmax.x
        && emax.x + COLLINEAR_EPSILON >= tmin.x
        && emin.y - COLLINEAR_EPSILON <= tmax.y
        && emax.y + COLLINEAR_EPSILON >= tmin.y
}

/// Intersection of two segments whose lines are not parallel.
fn segment_crossing(source: &(Point2, Point2), target: &(Point2, Point2)) -> Option<Point2> {
    let (p1, p2) = *source;
    let (p3, p4) = *target;
    let (x12, y12) = (p1.x - p2.x, p1.y - p2.y);
    let (x34, y34) = (p3.x - p4.x, p3.y - p4.y);
    let denom = x12 * y34 - y12 * x34;
    if denom.abs() < COLLINEAR_EPSILON {
        return None;
    }
    let u = p1.x * p2.y - p2.x * p1.y;
    let v = p3.x * p4.y - p4.x * p3.y;
    let hit = Point2::new((x34 * u - x12 * v) / denom, (y34 * u - y12 * v) / denom);
    (on_segment(source, &hit) && on_segment(target, &hit)).then_some(hit)
}

fn orientation(p: &Point2, q: &Point2, r: &Point2) -> PointOrientation {
    let qp = q - p;
    let rq = r - q;
    let val = qp.y * rq.x - qp.x * rq.y;
    if val.abs() < COLLINEAR_EPSILON {
        PointOrientation::Collinear
    } else if val > 0.0 {
        PointOrientation::Clockwise
    } else {
        PointOrientation::CounterClockwise
    }
}

fn near(a: &Point2, b: &Point2) -> bool {
    (a - b).norm_squared() < CLOSE_POINT_EPSILON * CLOSE_POINT_EPSILON
}

fn simplify(points: &[Point2], closed: bool, remove_close_and_collinear: bool) -> Vec<PointData> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let mut results = Vec::with_capacity(n);
    let mut corners = n;
    let mut last;

    if closed {
        let mut prev = n;
        loop {
            prev -= 1;
            if prev == 0 {
                // Every point coincides with the first one.
                return vec![PointData {
                    point: points[0],
                    orientation: PointOrientation::Collinear,
                    length: 0.0,
                    total_length: 0.0,
                }];
            }
            if !(remove_close_and_collinear && near(&points[0], &points[prev])) {
                break;
            }
        }
        corners = prev + 1;
        last = points[prev];
        results.push(PointData {
            point: points[0],
            orientation: orientation(&last, &points[0], &points[1 % corners]),
            length: (last - points[0]).norm(),
            total_length: 0.0,
        });
    } else {
        results.push(PointData {
            point: points[0],
            orientation: PointOrientation::Collinear,
            length: 0.0,
            total_length: 0.0,
        });
    }
    last = points[0];

    let mut total = 0.0;
    for i in 1..corners {
        let next = if i + 1 < corners { i + 1 } else { 0 };
        let or = orientation(&last, &points[i], &points[next]);
        if remove_close_and_collinear && or == PointOrientation::Collinear && next != 0 {
            continue;
        }
        let dist = (last - points[i]).norm();
        total += dist;
        results.push(PointData {
            point: points[i],
            orientation: or,
            length: dist,
            total_length: total,
        });
        last = points[i];
    }

    if closed && remove_close_and_collinear {
        while results.len() > 2
            && results.last().map(|p| p.orientation) == Some(PointOrientation::Collinear)
        {
            results.pop();
        }
        // The first point's incoming edge now starts at the new last point.
        if let (Some(first), Some(tail)) = (results.first().copied(), results.last().copied()) {
            results[0].length = (tail.point - first.point).norm();
        }
    }

    results
}

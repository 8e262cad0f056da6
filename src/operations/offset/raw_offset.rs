//! Per-vertex offset construction.
//!
//! Builds the raw offset contours of one group of paths. The contours may
//! overlap themselves; the caller unions them afterwards.
use std::f64::consts::PI;

use super::options::{EndCapStyle, JointStyle};
use crate::math::intersect_2d::line_intersection;
use crate::math::{Point2, Vector2};

/// Offsets smaller than this emit the input vertex unchanged.
const OFFSET_TOLERANCE: f64 = 1e-6;

/// Arc tolerance per decade of offset when none is given.
const DEFAULT_ARC_TOLERANCE: f64 = 0.25;

/// Joints with a cosine above this are treated as straight.
const STRAIGHT_COS: f64 = 0.99;

fn unit_normal(pt1: &Point2, pt2: &Point2) -> Vector2 {
    let d = pt2 - pt1;
    let len = d.norm();
    if len == 0.0 {
        return Vector2::zeros();
    }
    let d = d / len;
    Vector2::new(d.y, -d.x)
}

fn average_unit_vector(v1: &Vector2, v2: &Vector2) -> Vector2 {
    let sum = v1 + v2;
    let len = sum.norm();
    if len < OFFSET_TOLERANCE {
        Vector2::zeros()
    } else {
        sum / len
    }
}

fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.y * b.x - b.y * a.x
}

/// Offset parameters shared by every path of a group.
#[derive(Debug)]
pub(super) struct GroupOffsetter {
    delta: f64,
    abs_delta: f64,
    joint_style: JointStyle,
    end_cap: EndCapStyle,
    /// `2 / miter_limit²`, compared against `1 + cos(angle)`.
    miter_limit_sqr: f64,
    steps_per_rad: f64,
    step_sin: f64,
    step_cos: f64,
    normals: Vec<Vector2>,
    out: Vec<Point2>,
}

impl GroupOffsetter {
    /// `delta` is the signed distance each side moves.
    pub(super) fn new(
        delta: f64,
        joint_style: JointStyle,
        end_cap: EndCapStyle,
        miter_limit: f64,
        arc_tolerance: f64,
    ) -> Self {
        let abs_delta = delta.abs();
        let miter_limit_sqr = if miter_limit <= 1.0 {
            2.0
        } else {
            2.0 / (miter_limit * miter_limit)
        };

        let mut offsetter = Self {
            delta,
            abs_delta,
            joint_style,
            end_cap,
            miter_limit_sqr,
            steps_per_rad: 0.0,
            step_sin: 0.0,
            step_cos: 1.0,
            normals: Vec::new(),
            out: Vec::new(),
        };

        if (joint_style == JointStyle::Round || end_cap == EndCapStyle::Round) && abs_delta > 0.0 {
            let arc_tol = if arc_tolerance > 0.01 {
                arc_tolerance
            } else {
                (2.0 + abs_delta).log10() * DEFAULT_ARC_TOLERANCE
            };
            let steps_per_360 = PI / (1.0 - arc_tol / abs_delta).clamp(-1.0, 1.0).acos();
            let (mut sin, cos) = (2.0 * PI / steps_per_360).sin_cos();
            if delta < 0.0 {
                sin = -sin;
            }
            offsetter.step_sin = sin;
            offsetter.step_cos = cos;
            offsetter.steps_per_rad = steps_per_360 / (2.0 * PI);
        }
        offsetter
    }

    /// Offsets one path, already stripped of duplicate points, and returns
    /// its raw contours.
    pub(super) fn offset_path(&mut self, path: &[Point2]) -> Vec<Vec<Point2>> {
        match path.len() {
            0 => Vec::new(),
            1 => vec![self.point_cap(&path[0])],
            n if n < 3 && self.end_cap == EndCapStyle::Polygon => Vec::new(),
            n => {
                let end_cap = match self.end_cap {
                    // A two-point loop is just a line with matching caps.
                    EndCapStyle::Joined if n == 2 => {
                        if self.joint_style == JointStyle::Round {
                            EndCapStyle::Round
                        } else {
                            EndCapStyle::Square
                        }
                    }
                    other => other,
                };
                self.build_normals(path);
                match end_cap {
                    EndCapStyle::Polygon => vec![self.offset_polygon(path)],
                    EndCapStyle::Joined => {
                        let outer = self.offset_polygon(path);
                        let reversed: Vec<Point2> = path.iter().rev().copied().collect();
                        self.build_normals(&reversed);
                        vec![outer, self.offset_polygon(&reversed)]
                    }
                    cap => vec![self.offset_open_path(path, cap)],
                }
            }
        }
    }

    /// A single point becomes a circle or a square.
    fn point_cap(&self, pt: &Point2) -> Vec<Point2> {
        let r = self.abs_delta;
        if self.end_cap == EndCapStyle::Round {
            return crate::math::polygon_2d::ellipse_points(pt, r, r, 0);
        }
        vec![
            Point2::new(pt.x - r, pt.y - r),
            Point2::new(pt.x + r, pt.y - r),
            Point2::new(pt.x + r, pt.y + r),
            Point2::new(pt.x - r, pt.y + r),
        ]
    }

    fn build_normals(&mut self, path: &[Point2]) {
        let n = path.len();
        self.normals.clear();
        self.normals.extend((0..n).map(|i| unit_normal(&path[i], &path[(i + 1) % n])));
    }

    fn offset_polygon(&mut self, path: &[Point2]) -> Vec<Point2> {
        self.out = Vec::with_capacity(path.len());
        let mut k = path.len() - 1;
        for j in 0..path.len() {
            self.offset_point(path, j, &mut k);
        }
        std::mem::take(&mut self.out)
    }

    fn offset_open_path(&mut self, path: &[Point2], cap: EndCapStyle) -> Vec<Point2> {
        self.out = Vec::with_capacity(path.len() * 2);
        let high = path.len() - 1;

        if self.abs_delta < OFFSET_TOLERANCE {
            self.out.push(path[0]);
        } else {
            self.add_cap(path, 0, cap);
        }

        let mut k = 0;
        for j in 1..high {
            self.offset_point(path, j, &mut k);
        }

        // Walk back along the other side with reversed normals.
        for i in (1..=high).rev() {
            self.normals[i] = -self.normals[i - 1];
        }
        self.normals[0] = self.normals[high];

        self.add_cap(path, high, cap);

        let mut k = high;
        for j in (1..high).rev() {
            self.offset_point(path, j, &mut k);
        }
        std::mem::take(&mut self.out)
    }

    fn add_cap(&mut self, path: &[Point2], j: usize, cap: EndCapStyle) {
        match cap {
            EndCapStyle::Butt => {
                let n = self.normals[j];
                self.out.push(path[j] - n * self.delta);
                self.out.push(self.perpendicular(&path[j], &n));
            }
            EndCapStyle::Round => self.do_round(path, j, j, PI),
            _ => self.do_square(path, j, j),
        }
    }

    fn perpendicular(&self, pt: &Point2, normal: &Vector2) -> Point2 {
        pt + normal * self.delta
    }

    /// Emits the joint at vertex `j`, whose incoming edge has normal `k`.
    fn offset_point(&mut self, path: &[Point2], j: usize, k: &mut usize) {
        if self.abs_delta < OFFSET_TOLERANCE {
            self.out.push(path[j]);
            return;
        }

        let (nj, nk) = (self.normals[j], self.normals[*k]);
        let sin_a = cross(&nj, &nk).clamp(-1.0, 1.0);
        let cos_a = nj.dot(&nk);

        if cos_a > STRAIGHT_COS {
            self.do_miter(path, j, *k, cos_a);
        } else if cos_a > -STRAIGHT_COS && sin_a * self.delta < 0.0 {
            // Concave: bridge through the vertex so reversals clean up in the
            // union.
            self.out.push(self.perpendicular(&path[j], &nk));
            self.out.push(path[j]);
            self.out.push(self.perpendicular(&path[j], &nj));
        } else {
            match self.joint_style {
                JointStyle::Miter if cos_a > self.miter_limit_sqr - 1.0 => {
                    self.do_miter(path, j, *k, cos_a);
                }
                JointStyle::Miter | JointStyle::Square => self.do_square(path, j, *k),
                JointStyle::Round => self.do_round(path, j, *k, sin_a.atan2(cos_a)),
            }
        }
        *k = j;
    }

    fn do_square(&mut self, path: &[Point2], j: usize, k: usize) {
        let vec = if j == k {
            Vector2::new(self.normals[j].y, -self.normals[j].x)
        } else {
            average_unit_vector(
                &Vector2::new(-self.normals[k].y, self.normals[k].x),
                &Vector2::new(self.normals[j].y, -self.normals[j].x),
            )
        };

        // The vertex pushed out along the bisector, and the square edge
        // through it.
        let pt_q = path[j] + vec * self.abs_delta;
        let pt1 = pt_q + Vector2::new(vec.y, -vec.x) * self.delta;
        let pt2 = pt_q + Vector2::new(-vec.y, vec.x) * self.delta;
        let pt3 = self.perpendicular(&path[k], &self.normals[k]);

        if j == k {
            let pt4 = pt3 + vec * self.delta;
            let pt = line_intersection(&pt1, &pt2, &pt3, &pt4).unwrap_or(pt3);
            self.out.push(pt_q + (pt_q - pt));
            self.out.push(pt);
        } else {
            let pt4 = self.perpendicular(&path[j], &self.normals[k]);
            let pt = line_intersection(&pt1, &pt2, &pt3, &pt4).unwrap_or(pt4);
            self.out.push(pt);
            self.out.push(pt_q + (pt_q - pt));
        }
    }

    fn do_miter(&mut self, path: &[Point2], j: usize, k: usize, cos_a: f64) {
        let q = self.delta / (cos_a + 1.0);
        self.out.push(path[j] + (self.normals[k] + self.normals[j]) * q);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn do_round(&mut self, path: &[Point2], j: usize, k: usize, angle: f64) {
        let pt = path[j];
        let mut offset = self.normals[k] * self.delta;
        if j == k {
            offset = -offset;
        }
        self.out.push(pt + offset);

        // Skip near 180 degree concave turns.
        if angle > -PI + 0.01 {
            let steps = ((self.steps_per_rad * angle.abs()).ceil() as usize).max(2);
            for _ in 1..steps {
                offset = Vector2::new(
                    offset.x * self.step_cos - self.step_sin * offset.y,
                    offset.x * self.step_sin + offset.y * self.step_cos,
                );
                self.out.push(pt + offset);
            }
        }
        self.out.push(self.perpendicular(&pt, &self.normals[j]));
    }
}

use super::{Point2, Vector2, TOLERANCE};

/// Z component of `(pt2 - pt1) x (pt3 - pt2)`.
///
/// Positive when the path `pt1 -> pt2 -> pt3` turns left.
#[must_use]
pub fn cross_product(pt1: &Point2, pt2: &Point2, pt3: &Point2) -> f64 {
    (pt2.x - pt1.x) * (pt3.y - pt2.y) - (pt2.y - pt1.y) * (pt3.x - pt2.x)
}

/// Dot product of `(pt2 - pt1)` and `(pt3 - pt2)`.
#[must_use]
pub fn dot_product(pt1: &Point2, pt2: &Point2, pt3: &Point2) -> f64 {
    (pt2 - pt1).dot(&(pt3 - pt2))
}

/// 2D cross product of two vectors.
#[must_use]
pub fn cross(v1: &Vector2, v2: &Vector2) -> f64 {
    v1.y * v2.x - v2.y * v1.x
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Intersection point of the infinite lines through `ln1a-ln1b` and
/// `ln2a-ln2b`. Returns `None` when the lines are parallel.
#[must_use]
pub fn line_intersection(
    ln1a: &Point2,
    ln1b: &Point2,
    ln2a: &Point2,
    ln2b: &Point2,
) -> Option<Point2> {
    let dy1 = ln1b.y - ln1a.y;
    let dx1 = ln1b.x - ln1a.x;
    let dy2 = ln2b.y - ln2a.y;
    let dx2 = ln2b.x - ln2a.x;
    let det = dy1 * dx2 - dy2 * dx1;
    if det == 0.0 {
        return None;
    }
    let q1 = dy1 * ln1a.x - dx1 * ln1a.y;
    let q2 = dy2 * ln2a.x - dx2 * ln2a.y;
    let ip = Point2::new((dx2 * q1 - dx1 * q2) / det, (dy2 * q1 - dy1 * q2) / det);
    (ip.x.is_finite() && ip.y.is_finite()).then_some(ip)
}

/// Tests whether two segments cross.
///
/// With `inclusive`, touching endpoints count as an intersection but fully
/// collinear segments do not.
#[must_use]
pub fn segments_intersect(
    seg1a: &Point2,
    seg1b: &Point2,
    seg2a: &Point2,
    seg2b: &Point2,
    inclusive: bool,
) -> bool {
    let res1 = cross_product(seg1a, seg2a, seg2b);
    let res2 = cross_product(seg1b, seg2a, seg2b);
    let res3 = cross_product(seg2a, seg1a, seg1b);
    let res4 = cross_product(seg2b, seg1a, seg1b);
    if inclusive {
        if res1 * res2 > 0.0 || res3 * res4 > 0.0 {
            return false;
        }
        res1 != 0.0 || res2 != 0.0 || res3 != 0.0 || res4 != 0.0
    } else {
        res1 * res2 < 0.0 && res3 * res4 < 0.0
    }
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns the point of segment `seg1-seg2` closest to `off_pt`.
#[must_use]
pub fn closest_point_on_segment(off_pt: &Point2, seg1: &Point2, seg2: &Point2) -> Point2 {
    let d = seg2 - seg1;
    let len_sq = d.norm_squared();
    if len_sq == 0.0 {
        return *seg1;
    }
    let q = ((off_pt - seg1).dot(&d) / len_sq).clamp(0.0, 1.0);
    seg1 + d * q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_product_sign_follows_turn() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(cross_product(&a, &b, &Point2::new(1.0, 1.0)) > 0.0);
        assert!(cross_product(&a, &b, &Point2::new(1.0, -1.0)) < 0.0);
        assert!(cross_product(&a, &b, &Point2::new(2.0, 0.0)).abs() < TOLERANCE);
    }

    #[test]
    fn line_intersection_crossing() {
        let ip = line_intersection(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap_or_else(|| Point2::new(f64::NAN, f64::NAN));
        assert!((ip.x - 1.0).abs() < TOLERANCE);
        assert!((ip.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_intersection_parallel() {
        assert!(line_intersection(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        )
        .is_none());
    }

    #[test]
    fn segments_intersect_inclusive_touch() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 0.0);
        let d = Point2::new(1.0, 1.0);
        assert!(segments_intersect(&a, &b, &c, &d, true));
        assert!(!segments_intersect(&a, &b, &c, &d, false));
    }

    #[test]
    fn segment_segment_basic() {
        let hit = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(4.0, 0.0),
            &Point2::new(1.0, -1.0),
            &Point2::new(1.0, 1.0),
        );
        let (p, t, u) = hit.unwrap_or((Point2::origin(), -1.0, -1.0));
        assert!((p.x - 1.0).abs() < TOLERANCE);
        assert!((t - 0.25).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn closest_point_clamps_to_ends() {
        let s1 = Point2::new(0.0, 0.0);
        let s2 = Point2::new(10.0, 0.0);
        let p = closest_point_on_segment(&Point2::new(-5.0, 3.0), &s1, &s2);
        assert_eq!(p, s1);
        let p = closest_point_on_segment(&Point2::new(4.0, 3.0), &s1, &s2);
        assert!((p.x - 4.0).abs() < TOLERANCE && p.y.abs() < TOLERANCE);
    }
}

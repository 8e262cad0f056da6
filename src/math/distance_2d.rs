use super::Point2;

/// Returns the minimum distance from `p` to the segment `a-b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    point_to_segment_dist_sqrd(p, a, b).sqrt()
}

/// Squared version of [`point_to_segment_dist`].
#[must_use]
pub fn point_to_segment_dist_sqrd(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm_squared();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm_squared()
}

/// Squared perpendicular distance from `pt` to the infinite line through
/// `line1` and `line2`. Zero when the line is degenerate.
#[must_use]
pub fn perpendicular_dist_sqrd(pt: &Point2, line1: &Point2, line2: &Point2) -> f64 {
    let a = pt.x - line1.x;
    let b = pt.y - line1.y;
    let c = line2.x - line1.x;
    let d = line2.y - line1.y;
    if c == 0.0 && d == 0.0 {
        return 0.0;
    }
    let cross = a * d - c * b;
    cross * cross / (c * c + d * d)
}

/// Returns `true` if the squared distance between two points is below `tolerance_sqrd`.
#[must_use]
pub fn points_near(a: &Point2, b: &Point2, tolerance_sqrd: f64) -> bool {
    (a - b).norm_squared() <= tolerance_sqrd
}

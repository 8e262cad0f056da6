use std::f64::consts::PI;

use super::{Point2, Vector2};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise (y-up) rings, negative for clockwise. The
/// closing edge is implied; a repeated first point is harmless.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut prev = points[n - 1];
    for pt in points {
        sum += (prev.y + pt.y) * (prev.x - pt.x);
        prev = *pt;
    }
    sum * 0.5
}

/// Returns `true` if the ring has non-negative signed area.
#[must_use]
pub fn is_positive(points: &[Point2]) -> bool {
    signed_area(points) >= 0.0
}

/// Returns the index of the lexicographically smallest vertex (smallest x,
/// then smallest y). Returns 0 for empty input.
#[must_use]
pub fn bottom_left_index(points: &[Point2]) -> usize {
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x || (pt.x == b.x && pt.y < b.y) {
            best = i;
        }
    }
    best
}

/// Even-odd point-in-polygon test by horizontal ray casting.
#[must_use]
pub fn point_in_polygon_even_odd(p: &Point2, ring: &[Point2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[j];
        let b = ring[i];
        if (b.y > p.y) != (a.y > p.y) {
            let span = a.y - b.y;
            let span = if span == 0.0 { f64::EPSILON } else { span };
            let x_at = (a.x - b.x) * (p.y - b.y) / span + b.x;
            if p.x < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Non-zero winding point-in-polygon test.
#[must_use]
pub fn point_in_polygon_non_zero(p: &Point2, ring: &[Point2]) -> bool {
    winding_number(p, ring) != 0
}

/// Winding number of `ring` around `p`.
#[must_use]
pub fn winding_number(p: &Point2, ring: &[Point2]) -> i32 {
    let n = ring.len();
    if n < 3 {
        return 0;
    }
    let is_left = |a: &Point2, b: &Point2| (b - a).perp(&(p - a)) > 0.0;
    let mut winding = 0;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[j];
        let b = ring[i];
        if a.y <= p.y {
            if b.y > p.y && is_left(&a, &b) {
                winding += 1;
            }
        } else if b.y <= p.y && !is_left(&a, &b) {
            winding -= 1;
        }
        j = i;
    }
    winding
}

/// Removes consecutive duplicate points. For closed rings a final point equal
/// to the first one is also dropped.
#[must_use]
pub fn strip_duplicates(points: &[Point2], closed: bool) -> Vec<Point2> {
    let mut result: Vec<Point2> = Vec::with_capacity(points.len());
    for pt in points {
        if result.last() != Some(pt) {
            result.push(*pt);
        }
    }
    if closed && result.len() > 1 && result.last() == result.first() {
        result.pop();
    }
    result
}

/// Approximates an ellipse with a regular point ring, starting at angle 0 and
/// turning counter-clockwise.
///
/// `steps <= 2` picks a step count from the radii. Returns an empty ring for a
/// non-positive `radius_x`; a non-positive `radius_y` reuses `radius_x`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn ellipse_points(center: &Point2, radius_x: f64, radius_y: f64, steps: usize) -> Vec<Point2> {
    if radius_x <= 0.0 {
        return Vec::new();
    }
    let radius_y = if radius_y <= 0.0 { radius_x } else { radius_y };
    let steps = if steps <= 2 {
        ((PI * ((radius_x + radius_y) / 2.0).sqrt()).ceil() as usize).max(3)
    } else {
        steps
    };
    let step = 2.0 * PI / steps as f64;
    let (si, co) = step.sin_cos();
    let mut dir = Vector2::new(co, si);
    let mut result = Vec::with_capacity(steps);
    result.push(Point2::new(center.x + radius_x, center.y));
    for _ in 1..steps {
        result.push(Point2::new(center.x + radius_x * dir.x, center.y + radius_y * dir.y));
        dir = Vector2::new(dir.x * co - dir.y * si, dir.y * co + dir.x * si);
    }
    result
}

/// Reverses the ring in place when its orientation disagrees with `positive`.
pub fn ensure_orientation(points: &mut [Point2], positive: bool) {
    let area = signed_area(points);
    if area != 0.0 && (area > 0.0) != positive {
        points.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area(&square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert!((signed_area(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_ignores_repeated_close() {
        let mut pts = square();
        pts.push(pts[0]);
        assert!((signed_area(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn bottom_left_picks_smallest_x_then_y() {
        let pts = vec![
            Point2::new(1.0, 2.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, 0.5),
            Point2::new(2.0, 0.0),
        ];
        assert_eq!(bottom_left_index(&pts), 2);
    }

    #[test]
    fn point_in_polygon_rules_agree_on_simple_ring() {
        let ring = square();
        let inside = Point2::new(0.5, 0.5);
        let outside = Point2::new(1.5, 0.5);
        assert!(point_in_polygon_even_odd(&inside, &ring));
        assert!(point_in_polygon_non_zero(&inside, &ring));
        assert!(!point_in_polygon_even_odd(&outside, &ring));
        assert!(!point_in_polygon_non_zero(&outside, &ring));
    }

    #[test]
    fn winding_number_follows_orientation() {
        let mut ring = square();
        assert_eq!(winding_number(&Point2::new(0.5, 0.5), &ring), 1);
        ring.reverse();
        assert_eq!(winding_number(&Point2::new(0.5, 0.5), &ring), -1);
    }

    #[test]
    fn strip_duplicates_closed_ring() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        assert_eq!(strip_duplicates(&pts, true).len(), 3);
        assert_eq!(strip_duplicates(&pts, false).len(), 4);
    }

    #[test]
    fn ellipse_points_lie_on_ellipse() {
        let c = Point2::new(2.0, 3.0);
        let pts = ellipse_points(&c, 4.0, 2.0, 16);
        assert_eq!(pts.len(), 16);
        for p in &pts {
            let v = ((p.x - c.x) / 4.0).powi(2) + ((p.y - c.y) / 2.0).powi(2);
            assert!((v - 1.0).abs() < 1e-9);
        }
        assert!(signed_area(&pts) > 0.0);
    }

    #[test]
    fn ensure_orientation_reverses_when_needed() {
        let mut pts = square();
        ensure_orientation(&mut pts, false);
        assert!(signed_area(&pts) < 0.0);
        ensure_orientation(&mut pts, false);
        assert!(signed_area(&pts) < 0.0);
    }
}

use super::{Point2, Vector2};

/// Axis-aligned bounding rectangle.
///
/// An empty bounds (no points seen yet) has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner (left, top in y-down space).
    pub min: Point2,
    /// Maximum corner (right, bottom in y-down space).
    pub max: Point2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Creates an inverted (empty) bounds ready to be expanded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(-f64::MAX, -f64::MAX),
        }
    }

    /// Computes the bounds of a point set. Empty input yields [`Bounds::empty`].
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand(p);
        }
        bounds
    }

    /// Grows the bounds to include `point`.
    pub fn expand(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Returns the union of two bounds.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Returns `true` if no point has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    /// Returns the size as a vector.
    #[must_use]
    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width(), self.height())
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns `true` if the point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns `true` if the interiors of both bounds overlap.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x.max(other.min.x) < self.max.x.min(other.max.x)
            && self.min.y.max(other.min.y) < self.max.y.min(other.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_covers_all() {
        let b = Bounds::from_points(&[
            Point2::new(1.0, 5.0),
            Point2::new(-2.0, 3.0),
            Point2::new(4.0, -1.0),
        ]);
        assert_eq!(b.min, Point2::new(-2.0, -1.0));
        assert_eq!(b.max, Point2::new(4.0, 5.0));
        assert!((b.width() - 6.0).abs() < f64::EPSILON);
        assert!((b.height() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_bounds_has_zero_size() {
        let b = Bounds::from_points(&[]);
        assert!(b.is_empty());
        assert!(b.width().abs() < f64::EPSILON);
    }

    #[test]
    fn union_and_intersects() {
        let a = Bounds::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let b = Bounds::new(Point2::new(1.0, 1.0), Point2::new(3.0, 3.0));
        let c = Bounds::new(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        let u = a.union(&c);
        assert_eq!(u.max, Point2::new(6.0, 6.0));
        assert!(u.contains(&Point2::new(4.0, 4.0)));
    }
}

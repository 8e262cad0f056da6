use tracing::debug;

use crate::geometry::{ComplexPolygon, Path, Shape, SimplePath};
use crate::math::polygon_2d::{
    bottom_left_index, ensure_orientation, point_in_polygon_even_odd, point_in_polygon_non_zero, signed_area,
    strip_duplicates,
};
use crate::math::Point2;
use crate::operations::boolean::FillRule;

/// A closed ring placed in its nesting tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Vertices, counter-clockwise for outer rings and clockwise for holes.
    pub points: Vec<Point2>,
    /// Signed area after the orientation fix.
    pub signed_area: f64,
    /// Number of enclosing rings.
    pub depth: usize,
    /// Index of the smallest enclosing ring.
    pub parent: Option<usize>,
    /// Indices of the rings whose parent is this ring.
    pub holes: Vec<usize>,
}

impl Ring {
    #[must_use]
    pub fn is_hole(&self) -> bool {
        self.depth % 2 == 1
    }

    /// The ring as a closed path.
    #[must_use]
    pub fn to_path(&self) -> Path {
        Path::polygon(self.points.clone()).preserving_points()
    }
}

/// Orders an unordered set of closed rings into outers and holes.
///
/// Each ring's parent is the smallest other ring containing its bottom-left
/// vertex under the fill rule. Rings at even depth are turned
/// counter-clockwise and rings at odd depth clockwise. Open figures and
/// rings with fewer than three distinct points are dropped.
pub struct RingNormalizer<'a> {
    figures: &'a [SimplePath],
    fill_rule: FillRule,
}

impl<'a> RingNormalizer<'a> {
    /// Creates a new `RingNormalizer` using the non-zero fill rule.
    #[must_use]
    pub fn new(figures: &'a [SimplePath]) -> Self {
        Self {
            figures,
            fill_rule: FillRule::NonZero,
        }
    }

    /// `EvenOdd` uses ray-casting containment; every other rule uses the
    /// winding number.
    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    fn contains(&self, ring: &[Point2], point: &Point2) -> bool {
        match self.fill_rule {
            FillRule::EvenOdd => point_in_polygon_even_odd(point, ring),
            FillRule::NonZero | FillRule::Positive | FillRule::Negative => point_in_polygon_non_zero(point, ring),
        }
    }

    #[must_use]
    pub fn execute(&self) -> Vec<Ring> {
        let rings: Vec<Vec<Point2>> = self
            .figures
            .iter()
            .filter(|f| f.closed)
            .map(|f| strip_duplicates(&f.points, true))
            .filter(|r| r.len() >= 3)
            .collect();
        let areas: Vec<f64> = rings.iter().map(|r| signed_area(r)).collect();

        let parents: Vec<Option<usize>> = rings
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                let query = ring[bottom_left_index(ring)];
                rings
                    .iter()
                    .enumerate()
                    .filter(|&(j, other)| j != i && self.contains(other, &query))
                    .min_by(|a, b| areas[a.0].abs().total_cmp(&areas[b.0].abs()))
                    .map(|(j, _)| j)
            })
            .collect();

        // Coincident rings can contain each other; the walk stops after
        // visiting every ring once.
        let depth_of = |i: usize| {
            let mut depth = 0;
            let mut current = parents[i];
            while let Some(p) = current {
                depth += 1;
                if depth >= rings.len() {
                    break;
                }
                current = parents[p];
            }
            depth
        };
        let depths: Vec<usize> = (0..rings.len()).map(depth_of).collect();

        let mut result: Vec<Ring> = rings
            .into_iter()
            .enumerate()
            .map(|(i, mut points)| {
                ensure_orientation(&mut points, depths[i] % 2 == 0);
                Ring {
                    signed_area: signed_area(&points),
                    points,
                    depth: depths[i],
                    parent: parents[i],
                    holes: Vec::new(),
                }
            })
            .collect();
        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = parent {
                result[*p].holes.push(i);
            }
        }

        debug!(rings = result.len(), fill_rule = ?self.fill_rule, "normalized rings");
        result
    }

    /// Normalizes the rings and collects them into one composite.
    #[must_use]
    pub fn to_complex_polygon(&self) -> ComplexPolygon {
        ComplexPolygon::new(self.execute().iter().map(Ring::to_path).collect())
    }
}

impl Shape {
    /// Flattens the shape and normalizes its closed figures.
    #[must_use]
    pub fn normalized_rings(&self, fill_rule: FillRule) -> Vec<Ring> {
        RingNormalizer::new(&self.flatten()).with_fill_rule(fill_rule).execute()
    }
}

use crate::error::Result;
use crate::geometry::{Path, Shape};

use super::clipper::boolean_execute;
use super::select::{ClipOperation, FillRule};

/// Computes the boolean union of two groups of shapes.
pub struct Union<'a> {
    subject: &'a [Shape],
    clip: &'a [Shape],
    fill_rule: FillRule,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation using the non-zero fill rule.
    #[must_use]
    pub fn new(subject: &'a [Shape], clip: &'a [Shape]) -> Self {
        Self {
            subject,
            clip,
            fill_rule: FillRule::NonZero,
        }
    }

    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Executes the union.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ClipFailed` if the input is not finite or
    /// the clipper fails.
    pub fn execute(&self) -> Result<Vec<Path>> {
        boolean_execute(self.subject, self.clip, ClipOperation::Union, self.fill_rule)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area;
    use crate::math::Point2;

    fn square(x: f64, y: f64, size: f64) -> Shape {
        Path::polygon(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
        .into()
    }

    #[test]
    fn disjoint_squares_stay_separate() {
        let a = [square(0.0, 0.0, 10.0)];
        let b = [square(20.0, 0.0, 10.0)];
        let result = Union::new(&a, &b).execute().unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn union_with_nothing_cleans_the_subject() {
        let a = [square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)];
        let result = Union::new(&a, &[]).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!((signed_area(&result[0].points()) - 175.0).abs() < 1e-6);
    }
}

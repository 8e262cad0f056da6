use super::shape::Shape;
use crate::math::{Bounds, Matrix3, Point2};

/// An ordered list of independent shapes sharing a transform.
#[derive(Debug, Clone, Default)]
pub struct PathCollection {
    shapes: Vec<Shape>,
}

impl PathCollection {
    #[must_use]
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        if self.shapes.is_empty() {
            return Bounds::new(Point2::origin(), Point2::origin());
        }
        self.shapes
            .iter()
            .fold(Bounds::empty(), |acc, s| acc.union(&s.bounds()))
    }

    #[must_use]
    pub fn transform(&self, matrix: &Matrix3) -> Self {
        Self {
            shapes: self.shapes.iter().map(|s| s.transform(matrix)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PathCollection {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

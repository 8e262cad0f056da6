use crate::error::Result;
use crate::geometry::{Path, Shape};

use super::clipper::boolean_execute;
use super::select::{ClipOperation, FillRule};

/// Keeps the regions covered by exactly one of the two groups of shapes.
pub struct Xor<'a> {
    subject: &'a [Shape],
    clip: &'a [Shape],
    fill_rule: FillRule,
}

impl<'a> Xor<'a> {
    /// Creates a new `Xor` operation using the non-zero fill rule.
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

    /// Executes the exclusive or.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ClipFailed` if the input is not finite or
    /// the clipper fails.
    pub fn execute(&self) -> Result<Vec<Path>> {
        boolean_execute(self.subject, self.clip, ClipOperation::Xor, self.fill_rule)
    }
}

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::SimplePath;
use crate::math::Point2;

/// Relative slack before a run end is placed inside an edge rather than on
/// its end point.
const SPLIT_TOLERANCE: f64 = 1e-9;

/// Alternating on and off run lengths, as multiples of the stroke width.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    entries: Vec<f64>,
    starts_off: bool,
}

impl DashPattern {
    /// Creates a pattern whose first run is drawn.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if any entry is not a positive
    /// finite number.
    pub fn new(entries: Vec<f64>) -> Result<Self> {
        if let Some(bad) = entries.iter().find(|e| !(e.is_finite() && **e > 0.0)) {
            return Err(OperationError::InvalidInput(format!("dash entries must be positive, got {bad}")).into());
        }
        Ok(Self {
            entries,
            starts_off: false,
        })
    }

    /// Makes the first run a gap instead of a dash.
    #[must_use]
    pub fn starting_off(mut self) -> Self {
        self.starts_off = true;
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    #[must_use]
    pub fn starts_off(&self) -> bool {
        self.starts_off
    }

    /// Whether the pattern alternates at all. Shorter patterns stroke solid.
    #[must_use]
    pub fn is_dashed(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Cuts every figure into the polylines covered by "on" runs.
    ///
    /// The phase restarts at each figure. Closed figures are walked back to
    /// their first point.
    pub(super) fn on_runs(&self, figures: &[SimplePath], width: f64) -> Vec<Vec<Point2>> {
        let mut runs = Vec::new();
        if self.entries.is_empty() {
            return runs;
        }
        for figure in figures {
            self.split_figure(&figure.points, figure.closed, width, &mut runs);
        }
        debug!(figures = figures.len(), runs = runs.len(), "dash decomposition");
        runs
    }

    fn split_figure(&self, points: &[Point2], closed: bool, width: f64, runs: &mut Vec<Vec<Point2>>) {
        let Some(&first) = points.first() else {
            return;
        };
        let edge_count = if closed { points.len() } else { points.len() - 1 };

        let mut online = !self.starts_off;
        let mut index = 0;
        let mut target = self.entries[0] * width;
        let mut buffer: Vec<Point2> = Vec::new();
        let mut current = first;
        let mut i = 0;

        while i < edge_count {
            let next = points[(i + 1) % points.len()];
            let dist = (next - current).norm();
            if dist - target > SPLIT_TOLERANCE * dist.max(1.0) {
                let t = target / dist;
                let split = current + (next - current) * t;
                buffer.push(current);
                buffer.push(split);
                if online {
                    push_run(runs, std::mem::take(&mut buffer));
                } else {
                    buffer.clear();
                }
                online = !online;
                current = split;
                index = (index + 1) % self.entries.len();
                target = self.entries[index] * width;
            } else {
                buffer.push(current);
                current = next;
                i += 1;
                target = (target - dist).max(0.0);
            }
        }

        if !buffer.is_empty() {
            buffer.push(if closed { first } else { points[points.len() - 1] });
            if online {
                push_run(runs, buffer);
            }
        }
    }
}

/// Keeps runs that cover some distance.
fn push_run(runs: &mut Vec<Vec<Point2>>, run: Vec<Point2>) {
    if run.windows(2).any(|w| w[0] != w[1]) {
        runs.push(run);
    }
}

use tracing::debug;

use super::dash::DashPattern;
use super::offsetter::PolygonOffsetter;
use super::options::{EndCapStyle, OutlineOptions};
use crate::error::{OperationError, Result};
use crate::geometry::{ComplexPolygon, Path, Shape};
use crate::math::Matrix3;

/// Stroke widths below this are drawn on a scaled-up copy of the shape.
const MIN_STROKE_WIDTH: f64 = 0.5;

/// Generates the filled outline of a shape's stroke.
///
/// Closed figures are stroked as joined loops. Open figures and dash runs
/// get the configured end cap.
pub struct Outline<'a> {
    shape: &'a Shape,
    width: f64,
    options: OutlineOptions,
    pattern: Option<&'a DashPattern>,
}

impl<'a> Outline<'a> {
    /// Creates a new `Outline` operation with a solid stroke.
    #[must_use]
    pub fn new(shape: &'a Shape, width: f64) -> Self {
        Self {
            shape,
            width,
            options: OutlineOptions::default(),
            pattern: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Strokes only the "on" runs of `pattern`.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &'a DashPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Executes the outline.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the width is not a positive
    /// finite number and `OperationError::OffsetFailed` if the stroke cannot
    /// be built.
    pub fn execute(&self) -> Result<ComplexPolygon> {
        let width = self.width;
        if !(width.is_finite() && width > 0.0) {
            return Err(OperationError::InvalidInput(format!("stroke width must be positive, got {width}")).into());
        }
        if width >= MIN_STROKE_WIDTH {
            return self.stroke(self.shape, width);
        }

        let factor = 1.0 / width;
        debug!(width, factor, "rescaling thin stroke");
        let scaled = self.shape.transform(&Matrix3::new_scaling(factor));
        let outline = self.stroke(&scaled, 1.0)?;
        Ok(outline.transform(&Matrix3::new_scaling(width)))
    }

    fn stroke(&self, shape: &Shape, width: f64) -> Result<ComplexPolygon> {
        let options = self.options;
        let mut offsetter = PolygonOffsetter::new(options.offset_options());
        let figures = shape.flatten();

        match self.pattern {
            Some(pattern) if pattern.is_dashed() => {
                for run in pattern.on_runs(&figures, width) {
                    offsetter.add_paths(vec![run], options.joint_style, options.end_cap);
                }
            }
            _ => {
                for figure in figures {
                    let end_cap = if figure.closed { EndCapStyle::Joined } else { options.end_cap };
                    offsetter.add_paths(vec![figure.points], options.joint_style, end_cap);
                }
            }
        }

        let paths: Vec<Path> = offsetter.execute(width)?;
        Ok(ComplexPolygon::new(paths))
    }
}

/// Strokes every figure of `shape` with a solid line of the given width.
///
/// # Errors
///
/// See [`Outline::execute`].
pub fn generate_outline(shape: &Shape, width: f64, options: OutlineOptions) -> Result<ComplexPolygon> {
    Outline::new(shape, width).with_options(options).execute()
}

/// Strokes `shape` with a dashed line. Patterns with fewer than two entries
/// stroke a solid line.
///
/// # Errors
///
/// See [`Outline::execute`].
pub fn generate_dashed_outline(
    shape: &Shape,
    width: f64,
    pattern: &DashPattern,
    options: OutlineOptions,
) -> Result<ComplexPolygon> {
    Outline::new(shape, width)
        .with_options(options)
        .with_pattern(pattern)
        .execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::VectisError;
    use crate::math::polygon_2d::signed_area;
    use crate::math::Point2;
    use crate::operations::offset::JointStyle;

    fn line(length: f64) -> Shape {
        Path::polyline(vec![Point2::new(0.0, 0.0), Point2::new(length, 0.0)]).into()
    }

    fn square(size: f64) -> Shape {
        Path::polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ])
        .into()
    }

    fn area(outline: &ComplexPolygon) -> f64 {
        outline.paths().iter().map(|p| signed_area(&p.points())).sum()
    }

    #[test]
    fn butt_stroke_of_a_line() {
        let outline = generate_outline(&line(10.0), 2.0, OutlineOptions::default()).unwrap();
        assert_eq!(outline.len(), 1);
        assert_abs_diff_eq!(area(&outline), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn closed_figures_become_bands() {
        let options = OutlineOptions::default().with_joint_style(JointStyle::Miter);
        let outline = generate_outline(&square(10.0), 2.0, options).unwrap();
        assert_eq!(outline.len(), 2);
        // 12x12 minus 8x8.
        assert_abs_diff_eq!(area(&outline), 80.0, epsilon = 1e-6);
    }

    #[test]
    fn square_caps_extend_the_line() {
        let options = OutlineOptions::default().with_end_cap(EndCapStyle::Square);
        let outline = generate_outline(&line(10.0), 2.0, options).unwrap();
        let bounds = outline.bounds();
        assert_abs_diff_eq!(bounds.width(), 12.0, epsilon = 1e-6);
    }

    #[test]
    fn round_caps_are_smooth() {
        let options = OutlineOptions::default().with_end_cap(EndCapStyle::Round);
        let outline = generate_outline(&line(10.0), 2.0, options).unwrap();
        assert_eq!(outline.len(), 1);
        assert!(outline.paths()[0].points().len() > 60);
        // A 10x2 band plus two half discs of radius 1.
        assert_abs_diff_eq!(area(&outline), 20.0 + std::f64::consts::PI, epsilon = 0.01);
    }

    #[test]
    fn thin_strokes_are_rescaled() {
        let outline = generate_outline(&line(10.0), 0.1, OutlineOptions::default()).unwrap();
        assert_eq!(outline.len(), 1);
        assert_abs_diff_eq!(area(&outline), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outline.bounds().height(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn bad_widths_are_rejected() {
        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                generate_outline(&line(10.0), width, OutlineOptions::default()),
                Err(VectisError::Operation(OperationError::InvalidInput(_)))
            ));
        }
    }

    #[test]
    fn dashed_line_draws_each_run() {
        let pattern = DashPattern::new(vec![5.0, 5.0]).unwrap();
        let outline = generate_dashed_outline(&line(100.0), 2.0, &pattern, OutlineOptions::default()).unwrap();
        assert_eq!(outline.len(), 5);
        assert_abs_diff_eq!(area(&outline), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn single_entry_pattern_strokes_solid() {
        let pattern = DashPattern::new(vec![3.0]).unwrap();
        let outline = generate_dashed_outline(&line(10.0), 2.0, &pattern, OutlineOptions::default()).unwrap();
        assert_eq!(outline.len(), 1);
        assert_abs_diff_eq!(area(&outline), 20.0, epsilon = 1e-6);
    }
}

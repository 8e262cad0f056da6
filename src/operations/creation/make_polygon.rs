use super::ensure_positive;
use crate::error::{GeometryError, Result};
use crate::geometry::Path;
use crate::math::{Matrix3, Point2, Vector2};

/// Creates a regular polygon inscribed in a circle.
///
/// The first vertex is `(0, radius)` from the center rotated by `angle`
/// radians; the rest follow at equal angular steps.
pub struct MakeRegularPolygon {
    center: Point2,
    vertices: usize,
    radius: f64,
    angle: f64,
}

impl MakeRegularPolygon {
    #[must_use]
    pub fn new(center: Point2, vertices: usize, radius: f64) -> Self {
        Self {
            center,
            vertices,
            radius,
            angle: 0.0,
        }
    }

    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for fewer than three vertices
    /// and `GeometryError::NonPositive` for a non-positive radius.
    pub fn execute(&self) -> Result<Path> {
        if self.vertices < 3 {
            return Err(GeometryError::TooFewPoints {
                required: 3,
                actual: self.vertices,
            }
            .into());
        }
        ensure_positive("radius", self.radius)?;
        let radii = vec![self.radius; self.vertices];
        Ok(Path::polygon(radial_points(&self.center, &radii, self.angle)))
    }
}

/// Creates a star alternating between an outer and an inner radius.
pub struct MakeStar {
    center: Point2,
    prongs: usize,
    inner_radius: f64,
    outer_radius: f64,
    angle: f64,
}

impl MakeStar {
    #[must_use]
    pub fn new(center: Point2, prongs: usize, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            center,
            prongs,
            inner_radius,
            outer_radius,
            angle: 0.0,
        }
    }

    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Executes the operation. The first vertex is an outer one.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for fewer than three prongs and
    /// `GeometryError::NonPositive` for a non-positive radius.
    pub fn execute(&self) -> Result<Path> {
        if self.prongs < 3 {
            return Err(GeometryError::TooFewPoints {
                required: 3,
                actual: self.prongs,
            }
            .into());
        }
        ensure_positive("inner radius", self.inner_radius)?;
        ensure_positive("outer radius", self.outer_radius)?;
        let radii: Vec<f64> = (0..self.prongs * 2)
            .map(|i| {
                if i % 2 == 0 {
                    self.outer_radius
                } else {
                    self.inner_radius
                }
            })
            .collect();
        Ok(Path::polygon(radial_points(&self.center, &radii, self.angle)))
    }
}

#[allow(clippy::cast_precision_loss)]
fn radial_points(center: &Point2, radii: &[f64], angle: f64) -> Vec<Point2> {
    let step = std::f64::consts::TAU / radii.len() as f64;
    radii
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let rotation = Matrix3::new_rotation(angle + step * i as f64);
            center + rotation.transform_vector(&Vector2::new(0.0, *r))
        })
        .collect()
}

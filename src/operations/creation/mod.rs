mod make_ellipse;
mod make_polygon;
mod make_rectangle;

pub use make_ellipse::MakeEllipse;
pub use make_polygon::{MakeRegularPolygon, MakeStar};
pub use make_rectangle::MakeRectangle;

use crate::error::{GeometryError, Result};

fn ensure_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NonPositive { parameter, value }.into())
    }
}

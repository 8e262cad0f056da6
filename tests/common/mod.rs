#![allow(dead_code)]

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use vectis::geometry::{Path, Shape};
use vectis::math::polygon_2d::signed_area;
use vectis::math::Point2;

/// Installs a log subscriber once per test binary. `RUST_LOG` adjusts the
/// level.
pub fn init_tracing() {
    let env_filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Path {
    Path::polygon(vec![
        Point2::new(x, y),
        Point2::new(x + width, y),
        Point2::new(x + width, y + height),
        Point2::new(x, y + height),
    ])
}

pub fn rect_shape(x: f64, y: f64, width: f64, height: f64) -> Shape {
    rect(x, y, width, height).into()
}

/// Net signed area of closed paths.
pub fn total_area<'a>(paths: impl IntoIterator<Item = &'a Path>) -> f64 {
    paths.into_iter().map(|p| signed_area(&p.points())).sum()
}

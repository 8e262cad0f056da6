//! Polygon offsetting and stroke outlines.

mod dash;
mod offsetter;
mod options;
mod outline;
mod raw_offset;

pub use dash::DashPattern;
pub use offsetter::PolygonOffsetter;
pub use options::{EndCapStyle, JointStyle, OffsetOptions, OutlineOptions};
pub use outline::{generate_dashed_outline, generate_outline, Outline};

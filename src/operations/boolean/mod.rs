//! Polygon boolean operations.
//!
//! [`Clipper`] is the general entry point; [`Union`], [`Intersect`],
//! [`Difference`] and [`Xor`] wrap it for the common shape-versus-shape case.
mod clipper;
mod difference;
mod engine;
mod horizontal;
mod intersect;
mod intersect_op;
mod output;
mod select;
mod store;
mod union;
mod xor;

pub(crate) use clipper::CLIPPER_SCALE;
pub use clipper::{Clipper, ClipperOptions};
pub use difference::Difference;
pub use engine::ClipSolution;
pub use intersect_op::Intersect;
pub use select::{ClipOperation, FillRule, PathRole};
pub use union::Union;
pub use xor::Xor;

mod area;
mod bounding_box;
mod closest_point;
mod contains;
mod length;
mod point_along_path;

pub use area::Area;
pub use bounding_box::BoundingBox;
pub use closest_point::ClosestPoint;
pub use contains::Contains;
pub use length::Length;
pub use point_along_path::PointAlongPath;

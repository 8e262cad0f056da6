mod complex_polygon;
pub mod flatten;
mod flattened_path;
mod path;
mod path_collection;
pub mod segment;
mod shape;

pub use complex_polygon::ComplexPolygon;
pub use flattened_path::{FlattenedPath, PointInfo, PointOrientation, SegmentInfo};
pub use path::Path;
pub use path_collection::PathCollection;
pub use segment::{ArcSegment, CubicBezierSegment, LineSegment, LinearSegment};
pub use shape::{PathType, Shape, SimplePath};

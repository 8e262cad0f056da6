mod path_builder;
mod svg;

pub use path_builder::PathBuilder;
pub use svg::parse_svg_path;

pub mod boolean;
pub mod builder;
pub mod creation;
pub mod normalize;
pub mod offset;
pub mod query;
pub mod transform;

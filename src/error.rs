use thiserror::Error;

/// Top-level error type for the vectis geometry engine.
#[derive(Debug, Error)]
pub enum VectisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Parse(#[from] SvgParseError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while constructing segments and shapes.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("a cubic bezier chain needs 3n + 1 control points (n >= 1), got {count}")]
    InvalidControlPoints { count: usize },

    #[error("at least {required} points are required, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    #[error("{parameter} must be positive, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },
}

/// Errors raised while parsing SVG path data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SvgParseError {
    #[error("path data is empty")]
    Empty,

    #[error("path data must start with a moveto command")]
    MissingMoveTo,

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("expected a number at offset {offset}")]
    ExpectedNumber { offset: usize },

    #[error("expected an arc flag (0 or 1) at offset {offset}")]
    ExpectedFlag { offset: usize },
}

/// Internal failures of the sweep-line clipping engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipperError {
    #[error("the operation produced no output")]
    EmptyResult,

    #[error("input contains non-finite coordinates")]
    NonFinite,

    #[error("internal invariant violated: {0}")]
    InvariantViolated(&'static str),
}

/// Errors related to clipping, offsetting and outlining operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("an error occurred while attempting to clip the polygon")]
    ClipFailed(#[source] ClipperError),

    #[error("an error occurred while attempting to offset the polygon")]
    OffsetFailed(#[source] ClipperError),
}

/// Convenience type alias for results using [`VectisError`].
pub type Result<T> = std::result::Result<T, VectisError>;

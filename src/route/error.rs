use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteTransformError {
    #[error("Route nesting exceeds maximum depth {max_depth} at '{path}'")]
    TooDeep { path: String, max_depth: usize },

    #[error("Invalid meta for route '{path}': {message}")]
    InvalidMeta { path: String, message: String },
}

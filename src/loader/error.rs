use thiserror::Error;

use crate::route::RouteTransformError;

/// Route loader failures. The only error class that leaves the orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteLoadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Transform(#[from] RouteTransformError),

    #[error("{0}")]
    Other(String),
}

impl RouteLoadError {
    pub fn other(message: impl Into<String>) -> Self {
        RouteLoadError::Other(message.into())
    }
}

impl From<reqwest::Error> for RouteLoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RouteLoadError::Decode(err.to_string())
        } else {
            RouteLoadError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RouteLoadError {
    fn from(err: serde_json::Error) -> Self {
        RouteLoadError::Decode(err.to_string())
    }
}

// Crate-level error type for callers that drive the router end to end
use thiserror::Error;

use crate::host::NavigationError;
use crate::loader::RouteLoadError;
use crate::route::RouteTransformError;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    RouteLoad(#[from] RouteLoadError),

    #[error(transparent)]
    Transform(#[from] RouteTransformError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl RouterError {
    pub fn manifest(message: impl Into<String>) -> Self {
        RouterError::Manifest(message.into())
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            RouterError::RouteLoad(RouteLoadError::Network(_)) => "ROUTE_LOAD_NETWORK",
            RouterError::RouteLoad(RouteLoadError::Remote { .. }) => "ROUTE_LOAD_REMOTE",
            RouterError::RouteLoad(RouteLoadError::Decode(_)) => "ROUTE_LOAD_DECODE",
            RouterError::RouteLoad(RouteLoadError::Transform(_)) => "ROUTE_TRANSFORM",
            RouterError::RouteLoad(RouteLoadError::Other(_)) => "ROUTE_LOAD_ERROR",
            RouterError::Transform(_) => "ROUTE_TRANSFORM",
            RouterError::Navigation(NavigationError::Aborted { .. }) => "NAVIGATION_ABORTED",
            RouterError::Navigation(NavigationError::RedirectLoop { .. }) => "REDIRECT_LOOP",
            RouterError::Manifest(_) => "MANIFEST_ERROR",
        }
    }
}

// Route loaders: where the remote route/menu description comes from

pub mod cache;
pub mod error;
pub mod http;

pub use cache::{with_cache, CacheOptions, CachedRouteLoader};
pub use error::RouteLoadError;
pub use http::HttpRouteLoader;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::types::RouteDescriptor;

/// Fetches the route descriptors for the current session
#[async_trait]
pub trait RouteLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError>;
}

#[async_trait]
impl<L: RouteLoader + ?Sized> RouteLoader for Arc<L> {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        (**self).load().await
    }
}

/// Default loader: resolves to no routes
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRouteLoader;

#[async_trait]
impl RouteLoader for EmptyRouteLoader {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        Ok(Vec::new())
    }
}

/// Resolves to a fixed route list, e.g. one read from a manifest file
#[derive(Debug, Clone, Default)]
pub struct StaticRouteLoader {
    routes: Vec<RouteDescriptor>,
}

impl StaticRouteLoader {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl RouteLoader for StaticRouteLoader {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        Ok(self.routes.clone())
    }
}

/// Adapts an async closure into a loader
pub struct FnRouteLoader<F> {
    f: F,
}

impl<F, Fut> FnRouteLoader<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<RouteDescriptor>, RouteLoadError>> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> RouteLoader for FnRouteLoader<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<RouteDescriptor>, RouteLoadError>> + Send,
{
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        (self.f)().await
    }
}

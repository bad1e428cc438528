// Router host contract and the in-memory host

pub mod error;
pub mod matcher;
pub mod memory;

pub use error::NavigationError;
pub use memory::MemoryRouter;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::{GuardDecision, RouteMeta};

/// One record of the matched chain, outermost first
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRecord {
    pub name: Option<String>,
    pub path: String,
    pub meta: RouteMeta,
    pub catch_all: bool,
}

/// A resolved navigation target
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLocation {
    pub path: String,
    pub full_path: String,
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
    pub matched: Vec<MatchedRecord>,
    /// Meta of the matched chain merged parent to child
    pub meta: RouteMeta,
    pub redirect: Option<String>,
}

impl RouteLocation {
    pub fn is_matched(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Matched only through wildcard records
    pub fn is_catch_all_only(&self) -> bool {
        !self.matched.is_empty() && self.matched.iter().all(|r| r.catch_all)
    }
}

/// Called before every transition, in registration order
#[async_trait]
pub trait NavigationGuard: Send + Sync {
    async fn before_each(&self, to: &RouteLocation, from: Option<&RouteLocation>) -> GuardDecision;
}

/// What the orchestrator needs from the application's router
#[async_trait]
pub trait RouterHost: Send + Sync {
    /// Register a route; a route with the same name is replaced
    fn add_route(&self, route: crate::types::RouteDescriptor);

    fn has_route(&self, name: &str) -> bool;

    fn has_path(&self, path: &str) -> bool;

    fn route_names(&self) -> Vec<String>;

    fn before_each(&self, guard: Arc<dyn NavigationGuard>);

    fn resolve(&self, path: &str) -> RouteLocation;

    fn current_route(&self) -> Option<RouteLocation>;

    async fn push(&self, path: &str) -> Result<RouteLocation, NavigationError>;

    async fn replace(&self, path: &str) -> Result<RouteLocation, NavigationError>;
}

// Dynamic route orchestrator: load/cache/guard state machine

mod guard;
pub mod options;
pub mod router;
pub mod state;

pub use options::{
    AfterRouteLoad, BeforeRouteLoad, DynamicRouterOptions, LoggingErrorHandler,
    RouteLoadErrorHandler,
};
pub use router::{DynamicRouter, DynamicRoutes};
pub use state::{OrchestratorState, RouterPhase};

use async_trait::async_trait;
use std::sync::Arc;

use crate::event_bus::EventBus;
use crate::navigation::Navigator;

/// What collaborators (auth providers, error handlers) may do with the orchestrator
#[async_trait]
pub trait DynamicRouterHandle: Send + Sync {
    async fn attach_pending_navigation(&self);

    fn event_bus(&self) -> Arc<dyn EventBus>;

    fn navigator(&self) -> Arc<dyn Navigator>;

    fn is_loaded(&self) -> bool;

    fn pending_navigation(&self) -> Option<String>;
}

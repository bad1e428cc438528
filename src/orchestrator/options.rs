use std::sync::Arc;

use crate::auth::{AnonymousAuthProvider, AuthStateProvider};
use crate::config::RouterConfig;
use crate::event_bus::{EventBusProvider, NoopEventBus};
use crate::loader::{EmptyRouteLoader, RouteLoadError, RouteLoader};
use crate::navigation::{NavigationPaths, Navigator};
use crate::orchestrator::DynamicRouterHandle;
use crate::route::{AllowAll, PermissionFilter};
use crate::types::RouteDescriptor;

pub type BeforeRouteLoad = Arc<dyn Fn() + Send + Sync>;
pub type AfterRouteLoad = Arc<dyn Fn(&[RouteDescriptor]) + Send + Sync>;

/// Receives every route loader failure before it is returned to the caller
pub trait RouteLoadErrorHandler: Send + Sync {
    fn on_route_load_error(&self, router: &dyn DynamicRouterHandle, error: &RouteLoadError);
}

impl<F> RouteLoadErrorHandler for F
where
    F: Fn(&dyn DynamicRouterHandle, &RouteLoadError) + Send + Sync,
{
    fn on_route_load_error(&self, router: &dyn DynamicRouterHandle, error: &RouteLoadError) {
        self(router, error)
    }
}

/// Handler that only logs; the minimal "tell someone" configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingErrorHandler;

impl RouteLoadErrorHandler for LoggingErrorHandler {
    fn on_route_load_error(&self, _router: &dyn DynamicRouterHandle, error: &RouteLoadError) {
        tracing::error!("Route loading error: {}", error);
    }
}

/// Everything the orchestrator is composed from
pub struct DynamicRouterOptions {
    pub default_routes: Vec<RouteDescriptor>,
    pub route_loader: Arc<dyn RouteLoader>,
    pub permission_filter: Arc<dyn PermissionFilter>,
    pub auth_provider: Arc<dyn AuthStateProvider>,
    pub event_bus_provider: Box<dyn EventBusProvider>,
    /// `None` pushes straight into the host using `paths`
    pub navigator: Option<Arc<dyn Navigator>>,
    pub error_handler: Option<Arc<dyn RouteLoadErrorHandler>>,
    pub before_route_load: Option<BeforeRouteLoad>,
    pub after_route_load: Option<AfterRouteLoad>,
    pub paths: NavigationPaths,
    pub fallback_on_empty_pending: bool,
}

impl Default for DynamicRouterOptions {
    fn default() -> Self {
        Self {
            default_routes: Vec::new(),
            route_loader: Arc::new(EmptyRouteLoader),
            permission_filter: Arc::new(AllowAll),
            auth_provider: Arc::new(AnonymousAuthProvider),
            event_bus_provider: Box::new(Arc::new(NoopEventBus)),
            navigator: None,
            error_handler: None,
            before_route_load: None,
            after_route_load: None,
            paths: NavigationPaths::default(),
            fallback_on_empty_pending: false,
        }
    }
}

impl DynamicRouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            paths: NavigationPaths::from(&config.navigation),
            fallback_on_empty_pending: config.navigation.fallback_on_empty_pending,
            ..Self::default()
        }
    }

    pub fn default_routes(mut self, routes: Vec<RouteDescriptor>) -> Self {
        self.default_routes = routes;
        self
    }

    pub fn route_loader(mut self, loader: impl RouteLoader + 'static) -> Self {
        self.route_loader = Arc::new(loader);
        self
    }

    pub fn permission_filter(mut self, filter: impl PermissionFilter + 'static) -> Self {
        self.permission_filter = Arc::new(filter);
        self
    }

    pub fn auth_provider(mut self, provider: Arc<dyn AuthStateProvider>) -> Self {
        self.auth_provider = provider;
        self
    }

    pub fn event_bus_provider(mut self, provider: impl EventBusProvider + 'static) -> Self {
        self.event_bus_provider = Box::new(provider);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn error_handler(mut self, handler: impl RouteLoadErrorHandler + 'static) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn before_route_load(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.before_route_load = Some(Arc::new(hook));
        self
    }

    pub fn after_route_load(
        mut self,
        hook: impl Fn(&[RouteDescriptor]) + Send + Sync + 'static,
    ) -> Self {
        self.after_route_load = Some(Arc::new(hook));
        self
    }

    pub fn paths(mut self, paths: NavigationPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn fallback_on_empty_pending(mut self, enabled: bool) -> Self {
        self.fallback_on_empty_pending = enabled;
        self
    }
}

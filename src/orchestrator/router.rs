use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

use crate::auth::AuthStateProvider;
use crate::event_bus::{EventBus, EventBusProvider};
use crate::host::{MatchedRecord, RouteLocation, RouterHost};
use crate::loader::{RouteLoadError, RouteLoader};
use crate::navigation::{NavigationPaths, Navigator, RouterNavigator};
use crate::orchestrator::guard::DynamicRouteGuard;
use crate::orchestrator::options::{
    AfterRouteLoad, BeforeRouteLoad, DynamicRouterOptions, RouteLoadErrorHandler,
};
use crate::orchestrator::state::{OrchestratorState, RouterPhase};
use crate::orchestrator::DynamicRouterHandle;
use crate::route::{validate_route_structure, PermissionFilter};
use crate::types::{GuardDecision, NavigationTarget, RouteDescriptor};

/// Dynamic route orchestrator
///
/// Installs default routes at construction, loads remote routes on the first guarded
/// navigation (or on demand), registers the permitted ones into the host and replays
/// the navigation that was interrupted by a login or loading detour.
pub struct DynamicRouter {
    host: Arc<dyn RouterHost>,
    default_routes: Vec<RouteDescriptor>,
    route_loader: Arc<dyn RouteLoader>,
    permission_filter: Arc<dyn PermissionFilter>,
    auth_provider: Arc<dyn AuthStateProvider>,
    event_bus_provider: Box<dyn EventBusProvider>,
    navigator: Arc<dyn Navigator>,
    error_handler: Option<Arc<dyn RouteLoadErrorHandler>>,
    before_route_load: Option<BeforeRouteLoad>,
    after_route_load: Option<AfterRouteLoad>,
    paths: NavigationPaths,
    fallback_on_empty_pending: bool,
    state: Mutex<OrchestratorState>,
    loaded: watch::Sender<bool>,
}

/// The interface handed to the application by [`DynamicRouter::install`]
#[derive(Clone)]
pub struct DynamicRoutes {
    router: Arc<DynamicRouter>,
    loaded: watch::Receiver<bool>,
}

impl DynamicRoutes {
    pub fn is_loaded(&self) -> bool {
        *self.loaded.borrow()
    }

    /// Observe load state changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.loaded.clone()
    }

    /// Wait for authentication if needed, then load routes
    pub async fn load(&self) -> Result<(), RouteLoadError> {
        self.router.start_auth_listener().await.map(|_| ())
    }

    pub async fn reload(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        self.router.reload().await
    }

    pub fn router(&self) -> &Arc<DynamicRouter> {
        &self.router
    }
}

impl DynamicRouter {
    pub fn new(host: Arc<dyn RouterHost>, options: DynamicRouterOptions) -> Arc<Self> {
        let navigator = options
            .navigator
            .unwrap_or_else(|| Arc::new(RouterNavigator::new(host.clone(), options.paths.clone())));
        let (loaded, _) = watch::channel(false);

        let router = Arc::new(Self {
            host,
            default_routes: options.default_routes,
            route_loader: options.route_loader,
            permission_filter: options.permission_filter,
            auth_provider: options.auth_provider,
            event_bus_provider: options.event_bus_provider,
            navigator,
            error_handler: options.error_handler,
            before_route_load: options.before_route_load,
            after_route_load: options.after_route_load,
            paths: options.paths,
            fallback_on_empty_pending: options.fallback_on_empty_pending,
            state: Mutex::new(OrchestratorState::default()),
            loaded,
        });

        router.setup_default_routes();
        router
    }

    /// Register the navigation guard and expose `{is_loaded, load, reload}`
    ///
    /// Not idempotent: every call registers one more guard with the host.
    pub fn install(self: &Arc<Self>) -> DynamicRoutes {
        self.host
            .before_each(Arc::new(DynamicRouteGuard::new(Arc::downgrade(self))));
        tracing::info!(
            "Dynamic router installed with {} default routes",
            self.default_routes.len()
        );

        DynamicRoutes {
            router: self.clone(),
            loaded: self.loaded.subscribe(),
        }
    }

    /// Load, filter and register remote routes; returns the filtered list
    pub async fn load_routes(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        self.update_state(|s| {
            s.loads_started += 1;
            s.loads_in_flight += 1;
        });
        let in_flight = InFlightLoad(self);

        if let Some(hook) = &self.before_route_load {
            hook();
        }

        let result = self.route_loader.load().await;
        drop(in_flight);

        let loaded_routes = match result {
            Ok(routes) => routes,
            Err(error) => {
                tracing::error!("Failed to load routes: {}", error);
                if let Some(handler) = &self.error_handler {
                    handler.on_route_load_error(self, &error);
                }
                return Err(error);
            }
        };

        let filtered = self.permission_filter.filter(loaded_routes);

        let mut registered = 0;
        for route in &filtered {
            validate_route_structure(route);
            if self.is_route_exists(route) {
                tracing::trace!("Route {:?} already registered, skipping", route.name);
                continue;
            }
            self.host.add_route(route.clone());
            registered += 1;
        }

        self.update_state(|s| s.routes_loaded = true);
        self.loaded.send_replace(true);
        tracing::info!(
            "Loaded {} routes ({} newly registered)",
            filtered.len(),
            registered
        );

        if let Some(hook) = &self.after_route_load {
            hook(&filtered);
        }

        Ok(filtered)
    }

    /// Force a fresh load cycle even when routes are already loaded
    pub async fn reload(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        self.update_state(|s| s.routes_loaded = false);
        self.loaded.send_replace(false);
        self.load_routes().await
    }

    /// Suspend until authenticated, then load routes
    ///
    /// With a provider whose readiness never fires this never returns.
    pub async fn start_auth_listener(self: &Arc<Self>) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        if !self.auth_provider.is_authenticated() {
            tracing::debug!("Waiting for authentication before loading routes");
            let handle: Arc<dyn DynamicRouterHandle> = self.clone();
            self.auth_provider.wait_auth_ready(handle).await;
        }
        self.load_routes().await
    }

    pub async fn load_with_auth_check(self: &Arc<Self>) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        self.start_auth_listener().await
    }

    /// Navigate to the remembered target, or to the fallback when configured
    pub async fn attach_pending_navigation(&self) {
        match self.take_pending() {
            Some(target) => {
                tracing::info!("Replaying pending navigation to {}", target);
                self.navigator.navi_to(&target).await;
            }
            None if self.fallback_on_empty_pending => {
                tracing::debug!("No pending navigation, falling back to {}", self.paths.fallback);
                self.navigator.navi_to(&self.paths.fallback).await;
            }
            None => tracing::trace!("No pending navigation to replay"),
        }
    }

    /// Decide what happens to a navigation before the host commits it
    pub async fn evaluate_navigation(
        &self,
        to: &RouteLocation,
        _from: Option<&RouteLocation>,
    ) -> GuardDecision {
        if self.is_white_listed(to) {
            tracing::trace!("{} is whitelisted", to.full_path);
            return GuardDecision::Proceed;
        }

        if !self.auth_provider.is_authenticated() && !self.auth_provider.try_auto_login().await {
            self.auth_provider.on_auth_failed(self);
            self.set_pending(to.full_path.clone());
            tracing::debug!(
                "Unauthenticated navigation to {}, redirecting to {}",
                to.full_path, self.paths.login
            );
            return GuardDecision::redirect(self.paths.login.clone());
        }

        if !self.is_loaded() {
            return match self.load_routes().await {
                Ok(_) => self.post_load_decision(to),
                Err(_) if to.path == self.paths.error => GuardDecision::Proceed,
                Err(error) => {
                    tracing::warn!(
                        "Route loading failed during navigation to {}: {}",
                        to.full_path, error
                    );
                    GuardDecision::redirect(self.paths.error.clone())
                }
            };
        }

        if self.needs_auth(to) && !self.auth_provider.is_authenticated() {
            tracing::debug!("Session expired before reaching {}", to.full_path);
            return GuardDecision::redirect(self.paths.login.clone());
        }

        if to.matched.iter().any(|record| !self.record_permitted(record)) {
            tracing::debug!("Permission denied for {}", to.full_path);
            return GuardDecision::redirect(self.paths.no_permission.clone());
        }

        GuardDecision::Proceed
    }

    pub fn is_loaded(&self) -> bool {
        *self.loaded.borrow()
    }

    pub fn phase(&self) -> RouterPhase {
        self.state_snapshot().phase()
    }

    pub fn state_snapshot(&self) -> OrchestratorState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn pending_navigation(&self) -> Option<String> {
        self.state_snapshot().pending_navigation
    }

    pub fn host(&self) -> &Arc<dyn RouterHost> {
        &self.host
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        self.navigator.clone()
    }

    pub fn event_bus(&self) -> Arc<dyn EventBus> {
        self.event_bus_provider.event_bus()
    }

    pub fn paths(&self) -> &NavigationPaths {
        &self.paths
    }

    fn setup_default_routes(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.default_routes_installed {
            return;
        }

        for route in &self.default_routes {
            validate_route_structure(route);
            let present = match &route.name {
                Some(name) => self.host.has_route(name),
                None => self.host.has_path(&route.path),
            };
            if !present {
                self.host.add_route(route.clone());
            }
        }

        state.default_routes_installed = true;
    }

    fn is_route_exists(&self, route: &RouteDescriptor) -> bool {
        match &route.name {
            Some(name) => {
                self.host.has_route(name)
                    || self
                        .default_routes
                        .iter()
                        .any(|r| r.name.as_deref() == Some(name.as_str()))
            }
            None => self.host.has_path(&route.path),
        }
    }

    fn is_white_listed(&self, to: &RouteLocation) -> bool {
        // Before loading, a wildcard match may just mean the real route is not registered yet
        if !self.is_loaded() && to.is_catch_all_only() {
            return false;
        }
        to.matched.iter().any(|record| record.meta.is_white_listed())
    }

    fn needs_auth(&self, to: &RouteLocation) -> bool {
        to.matched.iter().any(|record| record.meta.needs_auth())
    }

    /// Only records carrying a permission key are checked
    fn record_permitted(&self, record: &MatchedRecord) -> bool {
        if record.meta.permission_key.is_none() {
            return true;
        }

        let probe = RouteDescriptor {
            path: record.path.clone(),
            name: record.name.clone(),
            component: None,
            redirect: None,
            meta: record.meta.clone(),
            children: Vec::new(),
        };
        self.permission_filter.allows(&probe)
    }

    fn post_load_decision(&self, to: &RouteLocation) -> GuardDecision {
        match self.take_pending() {
            Some(target) => GuardDecision::Redirect(NavigationTarget::push(target)),
            None => GuardDecision::Redirect(NavigationTarget::replace(to.full_path.clone())),
        }
    }

    fn set_pending(&self, target: String) {
        self.update_state(|s| s.pending_navigation = Some(target));
    }

    fn take_pending(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending_navigation
            .take()
    }

    fn update_state(&self, f: impl FnOnce(&mut OrchestratorState)) {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

/// Counts a load as finished when dropped, including when the load future is cancelled
struct InFlightLoad<'a>(&'a DynamicRouter);

impl Drop for InFlightLoad<'_> {
    fn drop(&mut self) {
        self.0
            .update_state(|s| s.loads_in_flight = s.loads_in_flight.saturating_sub(1));
    }
}

#[async_trait]
impl DynamicRouterHandle for DynamicRouter {
    async fn attach_pending_navigation(&self) {
        DynamicRouter::attach_pending_navigation(self).await
    }

    fn event_bus(&self) -> Arc<dyn EventBus> {
        DynamicRouter::event_bus(self)
    }

    fn navigator(&self) -> Arc<dyn Navigator> {
        DynamicRouter::navigator(self)
    }

    fn is_loaded(&self) -> bool {
        DynamicRouter::is_loaded(self)
    }

    fn pending_navigation(&self) -> Option<String> {
        DynamicRouter::pending_navigation(self)
    }
}

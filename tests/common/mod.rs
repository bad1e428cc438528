#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rim_router::auth::AuthStateProvider;
use rim_router::host::MemoryRouter;
use rim_router::loader::{RouteLoadError, RouteLoader};
use rim_router::{DynamicRouter, DynamicRouterHandle, DynamicRouterOptions, DynamicRoutes};
use rim_router::{RouteDescriptor, RouteMeta};

pub const AUTH_EVENT: &str = "auth-change";

/// Routes present before anything is fetched
pub fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("Home", "/home").with_meta(RouteMeta::protected()),
        RouteDescriptor::new("Login", "/login").with_meta(RouteMeta::public()),
        RouteDescriptor::new("Error", "/error").with_meta(RouteMeta::public()),
        RouteDescriptor::new("NoPermission", "/no-permission").with_meta(RouteMeta::public()),
        RouteDescriptor::catch_all("/:catchAll(.*)"),
    ]
}

/// What the backend hands out for a typical admin user
pub fn remote_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("Dashboard", "/dashboard").with_meta(RouteMeta::protected()),
        RouteDescriptor::new("System", "/system")
            .with_meta(RouteMeta::protected().with_permission("system"))
            .with_children(vec![
                RouteDescriptor::new("Roles", "roles")
                    .with_meta(RouteMeta::protected().with_permission("roles")),
                RouteDescriptor::new("Menus", "menus").with_meta(RouteMeta::protected()),
            ]),
    ]
}

/// Returns a fixed route list and counts how often it is asked
pub struct CountingLoader {
    routes: Vec<RouteDescriptor>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl CountingLoader {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes,
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl RouteLoader for CountingLoader {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.routes.clone())
    }
}

/// Always fails with a network error
#[derive(Default)]
pub struct FailingLoader {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RouteLoader for FailingLoader {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RouteLoadError::Network("connection refused".to_string()))
    }
}

/// Auth provider whose answers are set by the test; readiness never fires
#[derive(Default)]
pub struct ScriptedAuth {
    pub authenticated: AtomicBool,
    pub auto_login: AtomicBool,
    pub checks: AtomicUsize,
    pub failures: AtomicUsize,
}

impl ScriptedAuth {
    pub fn signed_in() -> Arc<Self> {
        let auth = Self::default();
        auth.authenticated.store(true, Ordering::SeqCst);
        Arc::new(auth)
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthStateProvider for ScriptedAuth {
    fn is_authenticated(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn wait_auth_ready(&self, _router: Arc<dyn DynamicRouterHandle>) -> bool {
        futures::future::pending::<bool>().await
    }

    async fn try_auto_login(&self) -> bool {
        if self.auto_login.load(Ordering::SeqCst) {
            self.authenticated.store(true, Ordering::SeqCst);
            return true;
        }
        false
    }

    fn on_auth_failed(&self, _router: &dyn DynamicRouterHandle) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub host: Arc<MemoryRouter>,
    pub router: Arc<DynamicRouter>,
    pub routes: DynamicRoutes,
}

/// Install a dynamic router over a fresh in-memory host
pub fn harness(options: DynamicRouterOptions) -> Harness {
    let host = Arc::new(MemoryRouter::new());
    let router = DynamicRouter::new(host.clone(), options.default_routes(default_routes()));
    let routes = router.install();
    Harness { host, router, routes }
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

mod common;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use common::{default_routes, remote_routes, CountingLoader, AUTH_EVENT};
use rim_router::auth::{TokenAuthProvider, TokenStore};
use rim_router::event_bus::LocalEventBus;
use rim_router::host::{MemoryRouter, RouterHost};
use rim_router::loader::RouteLoadError;
use rim_router::navigation::NavigationPaths;
use rim_router::{DynamicRouter, DynamicRouterOptions, DynamicRoutes};

struct Session {
    host: Arc<MemoryRouter>,
    router: Arc<DynamicRouter>,
    routes: DynamicRoutes,
    auth: Arc<TokenAuthProvider>,
    bus: Arc<LocalEventBus>,
}

fn session(options: DynamicRouterOptions) -> Session {
    let host = Arc::new(MemoryRouter::new());
    let bus = Arc::new(LocalEventBus::new());
    let auth = Arc::new(TokenAuthProvider::new(TokenStore::new(), AUTH_EVENT));

    let router = DynamicRouter::new(
        host.clone(),
        options
            .default_routes(default_routes())
            .route_loader(CountingLoader::new(remote_routes()))
            .auth_provider(auth.clone())
            .event_bus_provider(bus.clone()),
    );
    let routes = router.install();

    Session { host, router, routes, auth, bus }
}

impl Session {
    /// Start the auth listener and wait until it is subscribed
    async fn listen(&self) -> JoinHandle<Result<(), RouteLoadError>> {
        let routes = self.routes.clone();
        let handle = tokio::spawn(async move { routes.load().await });
        while self.bus.listener_count(AUTH_EVENT) == 0 {
            tokio::task::yield_now().await;
        }
        handle
    }

    fn sign_in(&self) {
        self.auth.sign_in("token-123", self.bus.as_ref());
    }
}

#[tokio::test]
async fn navigation_interrupted_by_login_is_replayed() -> Result<()> {
    let s = session(DynamicRouterOptions::new());
    let listener = s.listen().await;

    assert_eq!(s.host.push("/dashboard").await?.path, "/login");
    assert_eq!(s.router.pending_navigation().as_deref(), Some("/dashboard"));

    s.sign_in();
    tokio::time::timeout(Duration::from_secs(5), listener).await???;

    let current = s.host.current_route().expect("navigation committed");
    assert_eq!(current.name.as_deref(), Some("Dashboard"));
    assert!(s.router.pending_navigation().is_none());
    assert!(s.routes.is_loaded());
    assert_eq!(s.bus.listener_count(AUTH_EVENT), 0);
    Ok(())
}

#[tokio::test]
async fn events_without_a_token_keep_waiting() -> Result<()> {
    let s = session(DynamicRouterOptions::new());
    let listener = s.listen().await;

    s.auth.sign_out(s.bus.as_ref());
    tokio::task::yield_now().await;

    assert!(!listener.is_finished());
    assert!(!s.routes.is_loaded());
    listener.abort();
    Ok(())
}

#[tokio::test]
async fn nothing_pending_stays_put_by_default() -> Result<()> {
    let s = session(DynamicRouterOptions::new());
    let listener = s.listen().await;

    s.sign_in();
    tokio::time::timeout(Duration::from_secs(5), listener).await???;

    assert!(s.host.current_route().is_none());
    assert!(s.routes.is_loaded());
    Ok(())
}

#[tokio::test]
async fn nothing_pending_falls_back_when_enabled() -> Result<()> {
    let s = session(
        DynamicRouterOptions::new()
            .paths(NavigationPaths {
                fallback: "/home".to_string(),
                ..NavigationPaths::default()
            })
            .fallback_on_empty_pending(true),
    );
    let listener = s.listen().await;

    s.sign_in();
    tokio::time::timeout(Duration::from_secs(5), listener).await???;

    assert_eq!(s.host.current_route().map(|r| r.path).as_deref(), Some("/home"));
    Ok(())
}

#[tokio::test]
async fn sign_out_sends_the_next_navigation_to_login() -> Result<()> {
    let s = session(DynamicRouterOptions::new());
    s.auth.tokens().set("token-123");

    assert_eq!(s.host.push("/dashboard").await?.path, "/dashboard");

    s.auth.sign_out(s.bus.as_ref());
    assert_eq!(s.host.push("/system/menus").await?.path, "/login");
    assert_eq!(s.router.pending_navigation().as_deref(), Some("/system/menus"));
    Ok(())
}

#[tokio::test]
async fn already_authenticated_loads_immediately() -> Result<()> {
    let s = session(DynamicRouterOptions::new());
    s.auth.tokens().set("token-123");

    s.routes.load().await?;

    assert!(s.routes.is_loaded());
    assert_eq!(s.bus.listener_count(AUTH_EVENT), 0);
    Ok(())
}

// Authentication state as seen by the router. The core only ever asks whether a
// session exists; it never looks inside the token.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Notify;

use crate::event_bus::EventBus;
use crate::orchestrator::DynamicRouterHandle;

#[async_trait]
pub trait AuthStateProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Resolve once the session becomes available. May never resolve.
    async fn wait_auth_ready(&self, router: Arc<dyn DynamicRouterHandle>) -> bool;

    async fn try_auto_login(&self) -> bool {
        false
    }

    fn on_auth_failed(&self, _router: &dyn DynamicRouterHandle) {}
}

/// Default provider: never authenticated and never ready
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousAuthProvider;

#[async_trait]
impl AuthStateProvider for AnonymousAuthProvider {
    fn is_authenticated(&self) -> bool {
        false
    }

    async fn wait_auth_ready(&self, _router: Arc<dyn DynamicRouterHandle>) -> bool {
        futures::future::pending::<bool>().await
    }
}

/// Shared slot for the session token, standing in for persisted credentials
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        self.token.write().unwrap_or_else(PoisonError::into_inner).take();
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_present(&self) -> bool {
        self.token
            .read()
            .map(|t| t.as_deref().is_some_and(|t| !t.is_empty()))
            .unwrap_or(false)
    }
}

/// Token-backed provider; readiness is announced with an event on the router's bus
pub struct TokenAuthProvider {
    tokens: TokenStore,
    auth_event: String,
}

impl TokenAuthProvider {
    pub fn new(tokens: TokenStore, auth_event: impl Into<String>) -> Self {
        Self {
            tokens,
            auth_event: auth_event.into(),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn auth_event(&self) -> &str {
        &self.auth_event
    }

    /// Store the token and announce the transition
    pub fn sign_in(&self, token: impl Into<String>, bus: &dyn EventBus) {
        self.tokens.set(token);
        bus.emit(&self.auth_event, json!({ "isAuthenticated": true }));
    }

    pub fn sign_out(&self, bus: &dyn EventBus) {
        self.tokens.clear();
        bus.emit(&self.auth_event, json!({ "isAuthenticated": false }));
    }
}

#[async_trait]
impl AuthStateProvider for TokenAuthProvider {
    fn is_authenticated(&self) -> bool {
        self.tokens.is_present()
    }

    async fn wait_auth_ready(&self, router: Arc<dyn DynamicRouterHandle>) -> bool {
        let bus = router.event_bus();
        let ready = Arc::new(Notify::new());

        let (tokens, signal) = (self.tokens.clone(), ready.clone());
        let subscription = bus.on(
            &self.auth_event,
            Arc::new(move |_| {
                if tokens.is_present() {
                    signal.notify_one();
                }
            }),
        );

        while !self.is_authenticated() {
            ready.notified().await;
        }
        bus.off(&self.auth_event, subscription);

        tracing::info!("Authentication ready, replaying pending navigation");
        router.attach_pending_navigation().await;
        true
    }

    fn on_auth_failed(&self, _router: &dyn DynamicRouterHandle) {
        tracing::debug!("No session token present");
    }
}

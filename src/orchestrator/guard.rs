use async_trait::async_trait;
use std::sync::Weak;

use crate::host::{NavigationGuard, RouteLocation};
use crate::orchestrator::router::DynamicRouter;
use crate::types::GuardDecision;

/// Host-facing guard; holds the orchestrator weakly so host and orchestrator
/// do not keep each other alive
pub(crate) struct DynamicRouteGuard {
    router: Weak<DynamicRouter>,
}

impl DynamicRouteGuard {
    pub(crate) fn new(router: Weak<DynamicRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl NavigationGuard for DynamicRouteGuard {
    async fn before_each(&self, to: &RouteLocation, from: Option<&RouteLocation>) -> GuardDecision {
        match self.router.upgrade() {
            Some(router) => router.evaluate_navigation(to, from).await,
            None => GuardDecision::Proceed,
        }
    }
}

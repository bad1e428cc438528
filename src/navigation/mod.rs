// Navigation destinations, kept away from direct router manipulation

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::NavigationConfig;
use crate::host::RouterHost;

/// Well-known destinations the orchestrator redirects to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPaths {
    pub login: String,
    pub error: String,
    pub no_permission: String,
    pub fallback: String,
}

impl Default for NavigationPaths {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            error: "/error".to_string(),
            no_permission: "/no-permission".to_string(),
            fallback: "/".to_string(),
        }
    }
}

impl From<&NavigationConfig> for NavigationPaths {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            login: config.login_path.clone(),
            error: config.error_path.clone(),
            no_permission: config.no_permission_path.clone(),
            fallback: config.fallback_path.clone(),
        }
    }
}

#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navi_to(&self, path: &str);

    async fn navi_to_login(&self);

    async fn navi_to_no_permission(&self);

    async fn navi_to_error(&self);
}

/// Navigator that pushes straight into the router host
pub struct RouterNavigator {
    host: Arc<dyn RouterHost>,
    paths: NavigationPaths,
}

impl RouterNavigator {
    pub fn new(host: Arc<dyn RouterHost>, paths: NavigationPaths) -> Self {
        Self { host, paths }
    }
}

#[async_trait]
impl Navigator for RouterNavigator {
    async fn navi_to(&self, path: &str) {
        match self.host.push(path).await {
            Ok(location) => tracing::debug!("Navigated to {} (landed on {})", path, location.full_path),
            Err(e) => tracing::warn!("Navigation to {} failed: {}", path, e),
        }
    }

    async fn navi_to_login(&self) {
        self.navi_to(&self.paths.login).await
    }

    async fn navi_to_no_permission(&self) {
        self.navi_to(&self.paths.no_permission).await
    }

    async fn navi_to_error(&self) {
        self.navi_to(&self.paths.error).await
    }
}

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub environment: Environment,
    pub navigation: NavigationConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub login_path: String,
    pub error_path: String,
    pub no_permission_path: String,
    pub fallback_path: String,
    pub fallback_on_empty_pending: bool,
    pub max_redirects: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Zero disables expiry entirely
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub auth_event: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub menu_path: String,
    pub request_timeout_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_ms > 0).then(|| Duration::from_millis(self.ttl_ms))
    }
}

impl RemoteConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl RouterConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Navigation overrides
        if let Ok(v) = env::var("ROUTER_LOGIN_PATH") {
            self.navigation.login_path = v;
        }
        if let Ok(v) = env::var("ROUTER_ERROR_PATH") {
            self.navigation.error_path = v;
        }
        if let Ok(v) = env::var("ROUTER_NO_PERMISSION_PATH") {
            self.navigation.no_permission_path = v;
        }
        if let Ok(v) = env::var("ROUTER_FALLBACK_PATH") {
            self.navigation.fallback_path = v;
        }
        if let Ok(v) = env::var("ROUTER_FALLBACK_ON_EMPTY_PENDING") {
            self.navigation.fallback_on_empty_pending =
                v.parse().unwrap_or(self.navigation.fallback_on_empty_pending);
        }
        if let Ok(v) = env::var("ROUTER_MAX_REDIRECTS") {
            self.navigation.max_redirects = v.parse().unwrap_or(self.navigation.max_redirects);
        }

        // Cache overrides
        if let Ok(v) = env::var("ROUTER_CACHE_TTL_MS") {
            self.cache.ttl_ms = v.parse().unwrap_or(self.cache.ttl_ms);
        }

        // Auth overrides
        if let Ok(v) = env::var("ROUTER_AUTH_EVENT") {
            self.auth.auth_event = v;
        }

        // Remote loader overrides
        if let Ok(v) = env::var("ROUTER_REMOTE_BASE_URL") {
            self.remote.base_url = v;
        }
        if let Ok(v) = env::var("ROUTER_REMOTE_MENU_PATH") {
            self.remote.menu_path = v;
        }
        if let Ok(v) = env::var("ROUTER_REMOTE_TIMEOUT_SECS") {
            self.remote.request_timeout_secs = v.parse().unwrap_or(self.remote.request_timeout_secs);
        }

        self
    }

    fn navigation_defaults() -> NavigationConfig {
        NavigationConfig {
            login_path: "/login".to_string(),
            error_path: "/error".to_string(),
            no_permission_path: "/no-permission".to_string(),
            fallback_path: "/".to_string(),
            fallback_on_empty_pending: false,
            max_redirects: 10,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            navigation: Self::navigation_defaults(),
            cache: CacheConfig {
                ttl_ms: 5_000,
            },
            auth: AuthConfig {
                auth_event: "auth-change".to_string(),
            },
            remote: RemoteConfig {
                base_url: "http://localhost:8080/api".to_string(),
                menu_path: "/user/menus".to_string(),
                request_timeout_secs: 15,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            navigation: NavigationConfig {
                fallback_on_empty_pending: true,
                ..Self::navigation_defaults()
            },
            cache: CacheConfig {
                ttl_ms: 60_000,
            },
            auth: AuthConfig {
                auth_event: "auth-change".to_string(),
            },
            remote: RemoteConfig {
                base_url: "https://staging.example.com/api".to_string(),
                menu_path: "/user/menus".to_string(),
                request_timeout_secs: 15,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            navigation: NavigationConfig {
                fallback_on_empty_pending: true,
                max_redirects: 5,
                ..Self::navigation_defaults()
            },
            cache: CacheConfig {
                ttl_ms: 60_000,
            },
            auth: AuthConfig {
                auth_event: "auth-change".to_string(),
            },
            remote: RemoteConfig {
                base_url: "https://app.example.com/api".to_string(),
                menu_path: "/user/menus".to_string(),
                request_timeout_secs: 10,
            },
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::development()
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<RouterConfig> = Lazy::new(RouterConfig::from_env);

pub fn config() -> &'static RouterConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

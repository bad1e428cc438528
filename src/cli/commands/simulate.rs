use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{TokenAuthProvider, TokenStore};
use crate::cli::manifest::{default_admin_routes, load_manifest};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::error::RouterError;
use crate::event_bus::LocalEventBus;
use crate::host::{MemoryRouter, RouterHost};
use crate::loader::{with_cache, CacheOptions, StaticRouteLoader};
use crate::orchestrator::{DynamicRouter, DynamicRouterOptions, LoggingErrorHandler};
use crate::route::{PermissionKeyFilter, PermissionSet};

pub struct SimulateOptions {
    pub manifest: PathBuf,
    pub token: Option<String>,
    pub permissions: Vec<String>,
    pub login_after: Option<String>,
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Step {
    requested: String,
    landed: Option<String>,
    error: Option<String>,
}

pub async fn handle(options: SimulateOptions, output_format: OutputFormat) -> anyhow::Result<()> {
    let routes = match load_manifest(&options.manifest) {
        Ok(routes) => routes,
        Err(e) => {
            output_error(&output_format, &e.to_string(), Some(e.error_code()))?;
            return Err(e.into());
        }
    };

    let config = config();
    let host = Arc::new(MemoryRouter::with_max_redirects(config.navigation.max_redirects));
    let bus = Arc::new(LocalEventBus::new());
    let tokens = match &options.token {
        Some(token) => TokenStore::with_token(token.clone()),
        None => TokenStore::new(),
    };
    let auth = Arc::new(TokenAuthProvider::new(tokens, config.auth.auth_event.clone()));

    let router_options = DynamicRouterOptions::from_config(config)
        .default_routes(default_admin_routes())
        .route_loader(with_cache(
            StaticRouteLoader::new(routes),
            CacheOptions { ttl: config.cache.ttl() },
        ))
        .permission_filter(PermissionKeyFilter::new(PermissionSet::new(options.permissions)))
        .auth_provider(auth.clone())
        .event_bus_provider(bus.clone())
        .error_handler(LoggingErrorHandler);

    let router = DynamicRouter::new(host.clone(), router_options);
    let dynamic_routes = router.install();

    let mut listener = options.login_after.is_some().then(|| {
        let dynamic_routes = dynamic_routes.clone();
        tokio::spawn(async move { dynamic_routes.load().await })
    });

    let mut steps = Vec::with_capacity(options.paths.len());
    for (idx, path) in options.paths.iter().enumerate() {
        let step = match host.push(path).await {
            Ok(location) => Step {
                requested: path.clone(),
                landed: Some(location.full_path),
                error: None,
            },
            Err(e) => Step {
                requested: path.clone(),
                landed: None,
                error: Some(RouterError::from(e).to_string()),
            },
        };
        steps.push(step);

        if idx == 0 {
            if let Some(token) = &options.login_after {
                tracing::info!("Signing in after first navigation");
                auth.sign_in(token.clone(), bus.as_ref());
            }
            // Let the replay and load finish before the next navigation
            if let Some(listener) = listener.take() {
                if let Err(e) = listener.await? {
                    tracing::warn!("Auth listener failed to load routes: {}", e);
                }
            }
        }
    }

    let current = host.current_route().map(|location| location.full_path);

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            &format!("Simulated {} navigations", steps.len()),
            Some(json!({
                "steps": steps,
                "current": current,
                "history": host.history(),
                "loaded": dynamic_routes.is_loaded(),
                "pending": router.pending_navigation(),
            })),
        ),
        OutputFormat::Text => {
            for step in &steps {
                match (&step.landed, &step.error) {
                    (Some(landed), _) => println!("{} -> {}", step.requested, landed),
                    (None, Some(error)) => println!("{} !! {}", step.requested, error),
                    (None, None) => println!("{} -> ?", step.requested),
                }
            }
            println!("history: {}", host.history().join(" | "));
            output_success(
                &output_format,
                &format!(
                    "Finished at {} (routes loaded: {})",
                    current.as_deref().unwrap_or("<nowhere>"),
                    dynamic_routes.is_loaded()
                ),
                None,
            )
        }
    }
}

use serde_json::json;

use crate::auth::TokenStore;
use crate::cli::utils::{format_route_tree, output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::{config, RemoteConfig};
use crate::error::RouterError;
use crate::loader::{HttpRouteLoader, RouteLoadError, RouteLoader};
use crate::types::RouteDescriptor;

pub async fn handle(
    base_url: Option<String>,
    token: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut remote = config().remote.clone();
    if let Some(base_url) = base_url {
        remote.base_url = base_url;
    }

    let routes = match fetch_routes(&remote, token).await {
        Ok(routes) => routes,
        Err(e) => {
            let e = RouterError::from(e);
            output_error(&output_format, &e.to_string(), Some(e.error_code()))?;
            return Err(e.into());
        }
    };

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            &format!("Fetched {} routes", routes.len()),
            Some(json!({ "routes": routes })),
        ),
        OutputFormat::Text => {
            print!("{}", format_route_tree(&routes));
            output_success(&output_format, &format!("Fetched {} routes", routes.len()), None)
        }
    }
}

async fn fetch_routes(
    remote: &RemoteConfig,
    token: Option<String>,
) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
    let mut loader = HttpRouteLoader::from_config(remote)?;
    if let Some(token) = token {
        loader = loader.with_tokens(TokenStore::with_token(token));
    }
    tracing::info!("Fetching routes from {}", loader.endpoint());
    loader.load().await
}

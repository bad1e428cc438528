use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::auth::TokenStore;
use crate::config::RemoteConfig;
use crate::loader::{RouteLoadError, RouteLoader};
use crate::route::{transform_remote_routes, RawRoute};
use crate::types::RouteDescriptor;

/// Response envelope used by the admin backend: `code == 0` means success
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    code: i64,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Loads the current user's menu from the admin backend
pub struct HttpRouteLoader {
    client: reqwest::Client,
    endpoint: Url,
    tokens: Option<TokenStore>,
}

impl HttpRouteLoader {
    pub fn new(base_url: &str, menu_path: &str, timeout: Duration) -> Result<Self, RouteLoadError> {
        let endpoint = menu_endpoint(base_url, menu_path)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RouteLoadError::from)?;

        Ok(Self {
            client,
            endpoint,
            tokens: None,
        })
    }

    pub fn from_config(remote: &RemoteConfig) -> Result<Self, RouteLoadError> {
        Self::new(&remote.base_url, &remote.menu_path, remote.request_timeout())
    }

    /// Attach `Authorization: Bearer` from this store when a token is present
    pub fn with_tokens(mut self, tokens: TokenStore) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RouteLoader for HttpRouteLoader {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        let mut request = self.client.get(self.endpoint.clone());
        if let Some(token) = self.tokens.as_ref().and_then(TokenStore::get) {
            request = request.bearer_auth(token);
        }

        tracing::debug!("Fetching remote routes from {}", self.endpoint);

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RouteLoadError::Remote {
                code: i64::from(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        decode_menu_response(&body)
    }
}

/// Join the menu path onto the base URL without dropping the base's own path
fn menu_endpoint(base_url: &str, menu_path: &str) -> Result<Url, RouteLoadError> {
    let mut base = base_url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    Url::parse(&base)
        .and_then(|url| url.join(menu_path.trim_start_matches('/')))
        .map_err(|e| RouteLoadError::other(format!("Invalid route endpoint: {}", e)))
}

/// Unwrap the response envelope and transform the raw route list
pub fn decode_menu_response(body: &str) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
    let envelope: ResponseEnvelope = serde_json::from_str(body)?;

    if envelope.code != 0 {
        return Err(RouteLoadError::Remote {
            code: envelope.code,
            message: envelope
                .message
                .unwrap_or_else(|| "remote rejected the request".to_string()),
        });
    }

    let raw: Vec<RawRoute> = match envelope.data {
        Value::Null => Vec::new(),
        data => serde_json::from_value(data)?,
    };

    Ok(transform_remote_routes(raw)?)
}

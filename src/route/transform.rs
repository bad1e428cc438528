use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::route::error::RouteTransformError;
use crate::types::{ComponentRef, RouteDescriptor, RouteMeta};

/// Menus deeper than this are rejected instead of recursed into
pub const MAX_ROUTE_DEPTH: usize = 32;

/// Route record exactly as the remote menu endpoint returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoute {
    pub path: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub redirect: Option<String>,

    #[serde(default)]
    pub meta: Option<Map<String, Value>>,

    #[serde(default)]
    pub children: Option<Vec<RawRoute>>,
}

/// Map raw remote routes into descriptors, defaulting `requiresAuth` to true
pub fn transform_remote_routes(
    remote_routes: Vec<RawRoute>,
) -> Result<Vec<RouteDescriptor>, RouteTransformError> {
    transform_level(remote_routes, 1)
}

fn transform_level(
    routes: Vec<RawRoute>,
    depth: usize,
) -> Result<Vec<RouteDescriptor>, RouteTransformError> {
    routes
        .into_iter()
        .map(|raw| transform_route(raw, depth))
        .collect()
}

fn transform_route(raw: RawRoute, depth: usize) -> Result<RouteDescriptor, RouteTransformError> {
    if depth > MAX_ROUTE_DEPTH {
        return Err(RouteTransformError::TooDeep {
            path: raw.path,
            max_depth: MAX_ROUTE_DEPTH,
        });
    }

    let mut meta = Map::new();
    meta.insert("requiresAuth".to_string(), Value::Bool(true));
    if let Some(remote_meta) = raw.meta {
        meta.extend(remote_meta);
    }

    let meta: RouteMeta = serde_json::from_value(Value::Object(meta)).map_err(|e| {
        RouteTransformError::InvalidMeta {
            path: raw.path.clone(),
            message: e.to_string(),
        }
    })?;

    let children = match raw.children {
        Some(children) => transform_level(children, depth + 1)?,
        None => Vec::new(),
    };

    Ok(RouteDescriptor {
        path: raw.path,
        name: raw.name,
        component: raw.component.map(ComponentRef),
        redirect: raw.redirect,
        meta,
        children,
    })
}

/// Warn about unnamed routes that are not wildcards. Never fails.
pub fn validate_route_structure(route: &RouteDescriptor) -> bool {
    let mut valid = true;
    if route.name.is_none() && !route.is_catch_all() {
        tracing::warn!("Detected unnamed route: {}", route.path);
        valid = false;
    }

    for child in &route.children {
        valid &= validate_route_structure(child);
    }
    valid
}

use std::fs;
use std::path::Path;

use crate::error::RouterError;
use crate::route::{transform_remote_routes, RawRoute};
use crate::types::{RouteDescriptor, RouteMeta};

/// Read a raw route manifest (JSON, or YAML by extension) and transform it
pub fn load_manifest(path: &Path) -> Result<Vec<RouteDescriptor>, RouterError> {
    let content = fs::read_to_string(path)
        .map_err(|e| RouterError::manifest(format!("{}: {}", path.display(), e)))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_manifest(&content, is_yaml)
}

pub fn parse_manifest(content: &str, is_yaml: bool) -> Result<Vec<RouteDescriptor>, RouterError> {
    let raw: Vec<RawRoute> = if is_yaml {
        serde_yaml::from_str(content).map_err(|e| RouterError::manifest(e.to_string()))?
    } else {
        serde_json::from_str(content).map_err(|e| RouterError::manifest(e.to_string()))?
    };

    Ok(transform_remote_routes(raw)?)
}

/// Routes every admin shell registers before anything is loaded
pub fn default_admin_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("Root", "/")
            .with_redirect("/home")
            .with_meta(RouteMeta::protected()),
        RouteDescriptor::new("Login", "/login")
            .with_component("views/Login.vue")
            .with_meta(RouteMeta::public()),
        RouteDescriptor::new("Error", "/error")
            .with_component("views/Error.vue")
            .with_meta(RouteMeta::public()),
        RouteDescriptor::new("NoPermission", "/no-permission")
            .with_component("views/NoPermission.vue")
            .with_meta(RouteMeta::public()),
        RouteDescriptor::catch_all("/:catchAll(.*)").with_component("views/NotFound.vue"),
    ]
}

/// Shared route types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque handle to the view a route renders. The router never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(pub String);

impl ComponentRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Access metadata attached to a route record
///
/// `requires_auth` is deliberately tri-state: `Some(false)` whitelists the route,
/// `Some(true)` protects it, `None` does neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_auth: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_auth_check: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_key: Option<String>,

    /// Menu attributes (title, icon, ...) carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteMeta {
    pub fn protected() -> Self {
        Self {
            requires_auth: Some(true),
            ..Self::default()
        }
    }

    pub fn public() -> Self {
        Self {
            requires_auth: Some(false),
            ..Self::default()
        }
    }

    pub fn with_permission(mut self, key: impl Into<String>) -> Self {
        self.permission_key = Some(key.into());
        self
    }

    pub fn with_skip_auth_check(mut self) -> Self {
        self.skip_auth_check = Some(true);
        self
    }

    /// Whether this record exempts a navigation from authentication checks
    pub fn is_white_listed(&self) -> bool {
        self.skip_auth_check == Some(true) || self.requires_auth == Some(false)
    }

    pub fn needs_auth(&self) -> bool {
        self.requires_auth == Some(true)
    }

    /// Overlay `child` on top of `self`, the way nested records inherit meta
    pub fn merged_with(&self, child: &RouteMeta) -> RouteMeta {
        let mut extra = self.extra.clone();
        extra.extend(child.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        RouteMeta {
            requires_auth: child.requires_auth.or(self.requires_auth),
            skip_auth_check: child.skip_auth_check.or(self.skip_auth_check),
            permission_key: child
                .permission_key
                .clone()
                .or_else(|| self.permission_key.clone()),
            extra,
        }
    }
}

/// Declarative description of one navigable path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    #[serde(default)]
    pub meta: RouteMeta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            component: None,
            redirect: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// Unnamed wildcard record, e.g. `/:catchAll(.*)`
    pub fn catch_all(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: None,
            redirect: None,
            meta: RouteMeta::public(),
            children: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(ComponentRef::new(component));
        self
    }

    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }

    pub fn is_catch_all(&self) -> bool {
        is_catch_all_path(&self.path)
    }
}

/// Wildcard paths are the only ones allowed to stay unnamed
pub fn is_catch_all_path(path: &str) -> bool {
    path.starts_with("/:")
        && path.contains('(')
        && (path.contains(".*") || path.contains(".+"))
}

/// Where a navigation should go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub path: String,
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
}

impl NavigationTarget {
    pub fn push(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: false,
        }
    }

    pub fn replace(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: true,
        }
    }
}

/// Single-shot outcome of a navigation guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(NavigationTarget),
    Abort,
}

impl GuardDecision {
    pub fn redirect(path: impl Into<String>) -> Self {
        GuardDecision::Redirect(NavigationTarget::push(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catch_all_detection() {
        assert!(is_catch_all_path("/:catchAll(.*)"));
        assert!(is_catch_all_path("/:pathMatch(.*)*"));
        assert!(!is_catch_all_path("/:id"));
        assert!(!is_catch_all_path("/login"));
    }

    #[test]
    fn test_meta_round_trips_extra_keys() {
        let meta: RouteMeta = serde_json::from_value(json!({
            "requiresAuth": false,
            "title": "Login",
            "icon": "user"
        }))
        .unwrap();

        assert_eq!(meta.requires_auth, Some(false));
        assert_eq!(meta.extra.get("title"), Some(&json!("Login")));
        assert!(meta.is_white_listed());
    }

    #[test]
    fn test_child_meta_overrides_parent() {
        let parent = RouteMeta::protected().with_permission("system");
        let child = RouteMeta::public();

        let merged = parent.merged_with(&child);
        assert_eq!(merged.requires_auth, Some(false));
        assert_eq!(merged.permission_key.as_deref(), Some("system"));
    }
}

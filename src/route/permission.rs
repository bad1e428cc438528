use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::types::RouteDescriptor;

/// Narrows loaded routes down to what the current principal may access
///
/// Implementations must be deterministic: the same routes and the same permission
/// state always produce the same output, and the output is a subsequence of the input.
pub trait PermissionFilter: Send + Sync {
    fn allows(&self, route: &RouteDescriptor) -> bool;

    fn filter(&self, routes: Vec<RouteDescriptor>) -> Vec<RouteDescriptor> {
        routes
            .into_iter()
            .filter(|route| self.allows(route))
            .map(|mut route| {
                let children = std::mem::take(&mut route.children);
                route.children = self.filter(children);
                route
            })
            .collect()
    }
}

/// Pass-through filter used when nothing is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionFilter for AllowAll {
    fn allows(&self, _route: &RouteDescriptor) -> bool {
        true
    }

    fn filter(&self, routes: Vec<RouteDescriptor>) -> Vec<RouteDescriptor> {
        routes
    }
}

/// Permission keys granted to the current principal, shared with the application
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    keys: Arc<RwLock<HashSet<String>>>,
}

impl PermissionSet {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Arc::new(RwLock::new(keys.into_iter().map(Into::into).collect())),
        }
    }

    pub fn grant(&self, key: impl Into<String>) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into());
    }

    pub fn revoke(&self, key: &str) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Keeps routes whose `permissionKey` is absent or granted
#[derive(Debug, Clone, Default)]
pub struct PermissionKeyFilter {
    permissions: PermissionSet,
}

impl PermissionKeyFilter {
    pub fn new(permissions: PermissionSet) -> Self {
        Self { permissions }
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

impl PermissionFilter for PermissionKeyFilter {
    fn allows(&self, route: &RouteDescriptor) -> bool {
        match &route.meta.permission_key {
            Some(key) => self.permissions.contains(key),
            None => true,
        }
    }
}

/// Adapts a plain predicate into a filter
pub struct PredicateFilter<F> {
    predicate: F,
}

impl<F> PredicateFilter<F>
where
    F: Fn(&RouteDescriptor) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> PermissionFilter for PredicateFilter<F>
where
    F: Fn(&RouteDescriptor) -> bool + Send + Sync,
{
    fn allows(&self, route: &RouteDescriptor) -> bool {
        (self.predicate)(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RouteMeta;

    fn routes() -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor::new("Dashboard", "/dashboard").with_meta(RouteMeta::protected()),
            RouteDescriptor::new("Admin", "/admin")
                .with_meta(RouteMeta::protected().with_permission("admin")),
            RouteDescriptor::new("Reports", "/reports")
                .with_meta(RouteMeta::protected().with_permission("reports")),
            RouteDescriptor::new("Profile", "/profile"),
        ]
    }

    fn names(routes: &[RouteDescriptor]) -> Vec<String> {
        routes.iter().filter_map(|r| r.name.clone()).collect()
    }

    fn is_subsequence(sub: &[String], full: &[String]) -> bool {
        let mut it = full.iter();
        sub.iter().all(|s| it.any(|f| f == s))
    }

    #[test]
    fn test_allow_all_is_identity() {
        assert_eq!(AllowAll.filter(routes()), routes());
    }

    #[test]
    fn test_permission_key_filter_output_is_subsequence() {
        let all = names(&routes());
        let grants: [&[&str]; 4] = [&[], &["admin"], &["reports"], &["admin", "reports"]];

        for granted in grants {
            let filter = PermissionKeyFilter::new(PermissionSet::new(granted.iter().copied()));
            let kept = names(&filter.filter(routes()));
            assert!(is_subsequence(&kept, &all), "{:?} not a subsequence", kept);
            assert_eq!(kept.len(), 2 + granted.len());
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = PermissionKeyFilter::new(PermissionSet::new(["reports"]));
        let once = filter.filter(routes());
        let twice = filter.filter(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_children_are_pruned() {
        let tree = vec![RouteDescriptor::new("System", "/system").with_children(vec![
            RouteDescriptor::new("Users", "users"),
            RouteDescriptor::new("Audit", "audit")
                .with_meta(RouteMeta::protected().with_permission("audit")),
        ])];

        let filter = PermissionKeyFilter::new(PermissionSet::default());
        let kept = filter.filter(tree);
        assert_eq!(names(&kept[0].children), vec!["Users".to_string()]);
    }

    #[test]
    fn test_grant_and_revoke_change_outcome() {
        let permissions = PermissionSet::default();
        let filter = PermissionKeyFilter::new(permissions.clone());
        let admin = &routes()[1];

        assert!(!filter.allows(admin));
        permissions.grant("admin");
        assert!(filter.allows(admin));
        permissions.revoke("admin");
        assert!(!filter.allows(admin));
    }

    #[test]
    fn test_predicate_filter() {
        let filter = PredicateFilter::new(|r: &RouteDescriptor| r.path != "/profile");
        assert_eq!(filter.filter(routes()).len(), 3);
    }

    #[test]
    fn test_poisoned_set_still_grants_and_revokes() {
        let permissions = PermissionSet::new(["admin"]);
        let poisoner = permissions.clone();
        let _ = std::thread::spawn(move || {
            let _keys = poisoner.keys.write().unwrap();
            panic!("permission set poisoned");
        })
        .join();
        assert!(permissions.keys.is_poisoned());

        permissions.grant("reports");
        assert!(permissions.contains("admin"));
        assert!(permissions.contains("reports"));

        permissions.revoke("admin");
        assert!(!permissions.contains("admin"));
    }
}

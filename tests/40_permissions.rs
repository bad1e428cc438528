mod common;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use common::{count, harness, remote_routes, CountingLoader, ScriptedAuth};
use rim_router::host::RouterHost;
use rim_router::loader::{with_cache, CacheOptions};
use rim_router::route::{PermissionKeyFilter, PermissionSet, PredicateFilter};
use rim_router::{DynamicRouterOptions, RouteDescriptor};

#[tokio::test]
async fn granting_a_permission_takes_effect_on_reload() -> Result<()> {
    let permissions = PermissionSet::default();
    let h = harness(
        DynamicRouterOptions::new()
            .route_loader(CountingLoader::new(remote_routes()))
            .permission_filter(PermissionKeyFilter::new(permissions.clone()))
            .auth_provider(ScriptedAuth::signed_in()),
    );

    let loaded = h.routes.router().load_routes().await?;
    assert_eq!(loaded.len(), 1);
    assert!(h.host.has_route("Dashboard"));
    assert!(!h.host.has_route("System"));

    permissions.grant("system");
    let reloaded = h.routes.reload().await?;

    assert_eq!(reloaded.len(), 2);
    assert!(h.host.has_route("System"));
    assert!(h.host.has_route("Menus"));
    assert!(!h.host.has_route("Roles"));
    Ok(())
}

#[tokio::test]
async fn filtered_out_route_falls_through_to_not_found() -> Result<()> {
    let h = harness(
        DynamicRouterOptions::new()
            .route_loader(CountingLoader::new(remote_routes()))
            .permission_filter(PermissionKeyFilter::new(PermissionSet::default()))
            .auth_provider(ScriptedAuth::signed_in()),
    );

    h.routes.load().await?;
    let landed = h.host.push("/system/roles").await?;

    assert!(landed.is_catch_all_only());
    Ok(())
}

#[tokio::test]
async fn predicate_filter_hides_routes() -> Result<()> {
    let h = harness(
        DynamicRouterOptions::new()
            .route_loader(CountingLoader::new(remote_routes()))
            .permission_filter(PredicateFilter::new(|route: &RouteDescriptor| {
                route.name.as_deref() != Some("Menus")
            }))
            .auth_provider(ScriptedAuth::signed_in()),
    );

    h.routes.load().await?;

    assert!(h.host.has_route("System"));
    assert!(h.host.has_route("Roles"));
    assert!(!h.host.has_route("Menus"));
    Ok(())
}

#[tokio::test]
async fn cached_loader_serves_reloads_until_invalidated() -> Result<()> {
    let inner = CountingLoader::new(remote_routes());
    let calls = inner.calls();
    let cached = Arc::new(with_cache(inner, CacheOptions::default()));

    let h = harness(
        DynamicRouterOptions::new()
            .route_loader(cached.clone())
            .auth_provider(ScriptedAuth::signed_in()),
    );

    h.routes.load().await?;
    h.routes.reload().await?;
    assert_eq!(count(&calls), 1);

    cached.invalidate().await;
    h.routes.reload().await?;
    assert_eq!(count(&calls), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cached_loader_refetches_after_ttl() -> Result<()> {
    let inner = CountingLoader::new(remote_routes());
    let calls = inner.calls();

    let h = harness(
        DynamicRouterOptions::new()
            .route_loader(with_cache(inner, CacheOptions::ttl(Duration::from_secs(60))))
            .auth_provider(ScriptedAuth::signed_in()),
    );

    h.routes.load().await?;
    tokio::time::advance(Duration::from_secs(30)).await;
    h.routes.reload().await?;
    assert_eq!(count(&calls), 1);

    tokio::time::advance(Duration::from_secs(30)).await;
    h.routes.reload().await?;
    assert_eq!(count(&calls), 2);
    Ok(())
}

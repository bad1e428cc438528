use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::loader::{RouteLoadError, RouteLoader};
use crate::types::RouteDescriptor;

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// `None` or zero keeps the first successful result forever
    pub ttl: Option<Duration>,
}

impl CacheOptions {
    pub fn ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<RouteDescriptor>,
    fetched_at: Instant,
}

/// Time-bounded memoization around a route loader
///
/// The entry lock is held across the underlying fetch, so callers that arrive while
/// a fetch is in flight wait for it and then read the fresh entry.
pub struct CachedRouteLoader<L> {
    inner: L,
    ttl: Option<Duration>,
    entry: Mutex<Option<CacheEntry>>,
}

pub fn with_cache<L: RouteLoader>(loader: L, options: CacheOptions) -> CachedRouteLoader<L> {
    CachedRouteLoader {
        inner: loader,
        ttl: options.ttl.filter(|ttl| !ttl.is_zero()),
        entry: Mutex::new(None),
    }
}

impl<L: RouteLoader> CachedRouteLoader<L> {
    /// Drop the stored entry so the next load fetches again
    pub async fn invalidate(&self) {
        self.entry.lock().await.take();
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.duration_since(entry.fetched_at) < ttl,
            None => true,
        }
    }
}

#[async_trait]
impl<L: RouteLoader> RouteLoader for CachedRouteLoader<L> {
    async fn load(&self) -> Result<Vec<RouteDescriptor>, RouteLoadError> {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if self.is_fresh(cached, Instant::now()) {
                tracing::trace!("Route cache hit ({} routes)", cached.value.len());
                return Ok(cached.value.clone());
            }
            tracing::debug!("Route cache entry expired, refetching");
        }

        let value = self.inner.load().await?;
        *entry = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });

        Ok(value)
    }
}

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::host::matcher::{self, CompiledRecord};
use crate::host::{NavigationError, NavigationGuard, RouteLocation, RouterHost};
use crate::types::{GuardDecision, NavigationTarget, RouteDescriptor};

#[derive(Default)]
struct RouteTable {
    routes: Vec<RouteDescriptor>,
    records: Vec<CompiledRecord>,
}

#[derive(Default)]
struct NavigationState {
    current: Option<RouteLocation>,
    history: Vec<String>,
}

/// In-memory router host: route table, guard chain, current route and history
///
/// Locks are never held while a guard runs, so guards may call back into the host.
pub struct MemoryRouter {
    table: RwLock<RouteTable>,
    guards: RwLock<Vec<Arc<dyn NavigationGuard>>>,
    state: RwLock<NavigationState>,
    max_redirects: usize,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryRouter {
    pub fn new() -> Self {
        Self::with_max_redirects(10)
    }

    pub fn with_max_redirects(max_redirects: usize) -> Self {
        Self {
            table: RwLock::new(RouteTable::default()),
            guards: RwLock::new(Vec::new()),
            state: RwLock::new(NavigationState::default()),
            max_redirects,
        }
    }

    pub fn with_routes(routes: Vec<RouteDescriptor>) -> Self {
        let router = Self::new();
        for route in routes {
            router.add_route(route);
        }
        router
    }

    pub fn history(&self) -> Vec<String> {
        read(&self.state).history.clone()
    }

    pub fn guard_count(&self) -> usize {
        read(&self.guards).len()
    }

    async fn navigate(&self, target: NavigationTarget) -> Result<RouteLocation, NavigationError> {
        let original = target.path.clone();
        let mut target = target;

        'hops: for hop in 0..=self.max_redirects {
            let to = self.resolve(&target.path);

            // Record-level redirects apply before any guard sees the navigation
            if let Some(redirect) = to.redirect.clone() {
                tracing::trace!("Record redirect {} -> {}", to.full_path, redirect);
                target = NavigationTarget {
                    path: redirect,
                    replace: target.replace,
                };
                continue;
            }

            let from = self.current_route();
            let guards = read(&self.guards).clone();

            for guard in guards {
                match guard.before_each(&to, from.as_ref()).await {
                    GuardDecision::Proceed => {}
                    GuardDecision::Redirect(next) => {
                        tracing::debug!(
                            "Guard redirected {} -> {} (hop {})",
                            to.full_path, next.path, hop
                        );
                        target = next;
                        continue 'hops;
                    }
                    GuardDecision::Abort => {
                        tracing::debug!("Guard aborted navigation to {}", to.full_path);
                        return Err(NavigationError::Aborted { path: to.full_path });
                    }
                }
            }

            if !to.is_matched() {
                tracing::warn!("No route matches {}", to.full_path);
            }

            let mut state = write(&self.state);
            if target.replace && !state.history.is_empty() {
                state.history.pop();
            }
            state.history.push(to.full_path.clone());
            state.current = Some(to.clone());
            return Ok(to);
        }

        Err(NavigationError::RedirectLoop {
            path: original,
            max_redirects: self.max_redirects,
        })
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterHost for MemoryRouter {
    fn add_route(&self, route: RouteDescriptor) {
        let mut table = write(&self.table);

        let existing = route
            .name
            .as_ref()
            .and_then(|name| table.routes.iter().position(|r| r.name.as_ref() == Some(name)));
        match existing {
            Some(idx) => table.routes[idx] = route,
            None => table.routes.push(route),
        }

        table.records = matcher::compile(&table.routes);
    }

    fn has_route(&self, name: &str) -> bool {
        read(&self.table)
            .records
            .iter()
            .any(|r| r.name.as_deref() == Some(name))
    }

    fn has_path(&self, path: &str) -> bool {
        let path = matcher::normalize_path(path);
        read(&self.table).records.iter().any(|r| r.full_path == path)
    }

    fn route_names(&self) -> Vec<String> {
        read(&self.table)
            .records
            .iter()
            .filter_map(|r| r.name.clone())
            .collect()
    }

    fn before_each(&self, guard: Arc<dyn NavigationGuard>) {
        write(&self.guards).push(guard);
    }

    fn resolve(&self, path: &str) -> RouteLocation {
        matcher::resolve(&read(&self.table).records, path)
    }

    fn current_route(&self) -> Option<RouteLocation> {
        read(&self.state).current.clone()
    }

    async fn push(&self, path: &str) -> Result<RouteLocation, NavigationError> {
        self.navigate(NavigationTarget::push(path)).await
    }

    async fn replace(&self, path: &str) -> Result<RouteLocation, NavigationError> {
        self.navigate(NavigationTarget::replace(path)).await
    }
}

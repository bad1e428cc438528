// Publish/subscribe channel used to signal authentication transitions

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type EventCallback = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait EventBus: Send + Sync {
    fn on(&self, event: &str, callback: EventCallback) -> SubscriptionId;

    fn off(&self, event: &str, id: SubscriptionId);

    fn emit(&self, event: &str, payload: Value);
}

pub trait EventBusProvider: Send + Sync {
    fn event_bus(&self) -> Arc<dyn EventBus>;
}

impl<B: EventBus + 'static> EventBusProvider for Arc<B> {
    fn event_bus(&self) -> Arc<dyn EventBus> {
        self.clone()
    }
}

/// In-process bus; callbacks run synchronously on the emitting task
#[derive(Default)]
pub struct LocalEventBus {
    handlers: RwLock<HashMap<String, Vec<(SubscriptionId, EventCallback)>>>,
    next_id: AtomicU64,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl EventBus for LocalEventBus {
    fn on(&self, event: &str, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_string())
            .or_insert_with(Vec::new)
            .push((id, callback));
        tracing::trace!("Subscribed {:?} to '{}'", id, event);
        id
    }

    fn off(&self, event: &str, id: SubscriptionId) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = handlers.get_mut(event) {
            list.retain(|(existing, _)| *existing != id);
        }
    }

    fn emit(&self, event: &str, payload: Value) {
        // Callbacks may subscribe or unsubscribe, so never call them under the lock
        let callbacks: Vec<EventCallback> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();

        tracing::debug!("Emitting '{}' to {} listeners", event, callbacks.len());
        for callback in callbacks {
            callback(&payload);
        }
    }
}

/// Bus that drops everything, used when no provider is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventBus;

impl EventBus for NoopEventBus {
    fn on(&self, _event: &str, _callback: EventCallback) -> SubscriptionId {
        SubscriptionId(0)
    }

    fn off(&self, _event: &str, _id: SubscriptionId) {}

    fn emit(&self, _event: &str, _payload: Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_reaches_matching_listeners_only() {
        let bus = LocalEventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        bus.on("auth-change", Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        bus.emit("auth-change", json!({ "isAuthenticated": true }));
        bus.emit("other", Value::Null);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_off_removes_listener() {
        let bus = LocalEventBus::new();
        let id = bus.on("auth-change", Arc::new(|_| {}));
        assert_eq!(bus.listener_count("auth-change"), 1);

        bus.off("auth-change", id);
        assert_eq!(bus.listener_count("auth-change"), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let bus = Arc::new(LocalEventBus::new());
        let slot: Arc<RwLock<Option<SubscriptionId>>> = Arc::new(RwLock::new(None));

        let (inner_bus, inner_slot) = (bus.clone(), slot.clone());
        let id = bus.on("once", Arc::new(move |_| {
            if let Some(id) = *inner_slot.read().unwrap() {
                inner_bus.off("once", id);
            }
        }));
        *slot.write().unwrap() = Some(id);

        bus.emit("once", Value::Null);
        assert_eq!(bus.listener_count("once"), 0);
    }

    #[test]
    fn test_poisoned_registry_keeps_working() {
        let bus = Arc::new(LocalEventBus::new());
        let poisoner = bus.clone();
        let _ = std::thread::spawn(move || {
            let _handlers = poisoner.handlers.write().unwrap();
            panic!("listener registry poisoned");
        })
        .join();
        assert!(bus.handlers.is_poisoned());

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let id = bus.on("auth-change", Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(bus.listener_count("auth-change"), 1);

        bus.emit("auth-change", Value::Null);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        bus.off("auth-change", id);
        assert_eq!(bus.listener_count("auth-change"), 0);
    }
}

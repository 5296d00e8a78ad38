//! Listener registry for native-to-UI event dispatch.
//!
//! Callbacks register under a string event name and run in
//! registration order when the channel dispatches that event.
//! Registering the same callback twice yields two registrations and
//! two invocations per event; removal is by [`ListenerId`], never by
//! callback identity.
//!
//! Registration is scoped: [`add`](ListenerRegistry::add) hands back a
//! [`ListenerHandle`] that unregisters on drop unless explicitly
//! detached, so repeated UI mounts cannot leak callbacks across a
//! long-lived channel.

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use crate::identifiers::ListenerId;
use crate::protocol::Event;

// ============================================================================
// Types
// ============================================================================

/// Event listener callback type.
///
/// Receives the event payload by reference; listeners that need to keep
/// the payload clone it themselves.
pub type ListenerCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// One registration: id plus callback, in insertion order.
type ListenerList = Vec<(ListenerId, ListenerCallback)>;

// ============================================================================
// ListenerRegistry
// ============================================================================

/// Registry of event listeners shared between the facade and the
/// channel dispatch loop.
///
/// # Thread Safety
///
/// All operations take a short internal lock. Dispatch clones the
/// callback list out of the lock before invoking anything, so a
/// callback may add or remove listeners without deadlocking;
/// registrations made during a dispatch take effect for the next
/// event.
#[derive(Default)]
pub struct ListenerRegistry {
    /// Listeners keyed by event name.
    listeners: Mutex<FxHashMap<String, ListenerList>>,
    /// Allocator for registration IDs.
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for an event name.
    ///
    /// Returns the registration ID. Callers normally go through
    /// [`BrowserProxy::add_listener`](crate::proxy::BrowserProxy::add_listener),
    /// which wraps the ID in a scoped [`ListenerHandle`].
    pub fn add(&self, event: impl Into<String>, callback: ListenerCallback) -> ListenerId {
        let id = ListenerId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let event = event.into();

        let mut listeners = self.listeners.lock();
        listeners.entry(event).or_default().push((id, callback));
        id
    }

    /// Removes a registration by ID.
    ///
    /// Idempotent: removing an unknown or already-removed ID is a no-op.
    /// Returns `true` if a registration was removed.
    pub fn remove(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(list) = listeners.get_mut(event) else {
            return false;
        };

        let before = list.len();
        list.retain(|(entry_id, _)| *entry_id != id);
        let removed = list.len() < before;

        if list.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    /// Dispatches an event to every listener, in registration order.
    ///
    /// Returns the number of callbacks invoked. Events with no
    /// listeners are dropped.
    pub fn dispatch(&self, event: &Event) -> usize {
        let snapshot: ListenerList = {
            let listeners = self.listeners.lock();
            match listeners.get(&event.event) {
                Some(list) => list.clone(),
                None => {
                    trace!(event = %event.event, "Event with no listeners dropped");
                    return 0;
                }
            }
        };

        for (id, callback) in &snapshot {
            trace!(event = %event.event, listener = %id, "Dispatching event");
            callback(&event.payload);
        }
        snapshot.len()
    }

    /// Returns the number of registrations for an event name.
    #[must_use]
    pub fn count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.lock();
        f.debug_struct("ListenerRegistry")
            .field("events", &listeners.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ListenerHandle
// ============================================================================

/// Scoped handle to one listener registration.
///
/// Dropping the handle unregisters the callback. Call
/// [`detach`](Self::detach) to pin the registration for the remaining
/// channel lifetime instead.
#[must_use = "dropping the handle unregisters the listener"]
pub struct ListenerHandle {
    /// Registry the listener lives in; weak so a handle outliving the
    /// channel is harmless.
    registry: Weak<ListenerRegistry>,
    /// Event name the listener registered under.
    event: String,
    /// Registration ID.
    id: ListenerId,
    /// Set once removed or detached.
    released: bool,
}

impl ListenerHandle {
    /// Creates a handle for a fresh registration.
    pub(crate) fn new(registry: &Arc<ListenerRegistry>, event: String, id: ListenerId) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            event,
            id,
            released: false,
        }
    }

    /// Returns the registration ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns the event name this listener registered under.
    #[inline]
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Removes the registration now.
    ///
    /// Idempotent: safe to call repeatedly, and safe after the channel
    /// is gone.
    pub fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.event, self.id);
        }
    }

    /// Pins the registration for the remaining channel lifetime.
    ///
    /// The callback keeps firing until the channel shuts down.
    pub fn detach(mut self) {
        self.released = true;
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("event", &self.event)
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;

    use serde_json::json;

    fn counting_callback(hits: &Arc<AtomicUsize>) -> ListenerCallback {
        let hits = Arc::clone(hits);
        Arc::new(move |_payload: &Value| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            registry.add("device-info-changed", Arc::new(move |_: &Value| {
                order.lock().push(tag);
            }));
        }

        let event = Event::new("device-info-changed", json!([{"id": 1}]));
        assert_eq!(registry.dispatch(&event), 3);
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_callback_invoked_twice() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let callback = counting_callback(&hits);

        let first = registry.add("e", Arc::clone(&callback));
        let second = registry.add("e", callback);
        assert_ne!(first, second);

        registry.dispatch(&Event::new("e", Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dispatch_passes_exact_payload() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = Arc::clone(&seen);
        registry.add("device-info-changed", Arc::new(move |payload: &Value| {
            *seen_clone.lock() = Some(payload.clone());
        }));

        let payload = json!([{"id": 1}, {"id": 2}]);
        registry.dispatch(&Event::new("device-info-changed", payload.clone()));

        assert_eq!(seen.lock().take(), Some(payload));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = registry.add("e", counting_callback(&hits));

        assert!(registry.remove("e", id));
        assert!(!registry.remove("e", id));
        assert!(!registry.remove("other", id));

        registry.dispatch(&Event::new("e", Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_without_listeners_is_dropped() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.dispatch(&Event::new("nobody-home", Value::Null)), 0);
    }

    #[test]
    fn test_handle_drop_unregisters() {
        let registry = Arc::new(ListenerRegistry::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let id = registry.add("e", counting_callback(&hits));
        let handle = ListenerHandle::new(&registry, "e".to_string(), id);
        assert_eq!(registry.count("e"), 1);

        drop(handle);
        assert_eq!(registry.count("e"), 0);
    }

    #[test]
    fn test_handle_detach_keeps_registration() {
        let registry = Arc::new(ListenerRegistry::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let id = registry.add("e", counting_callback(&hits));
        let handle = ListenerHandle::new(&registry, "e".to_string(), id);
        handle.detach();

        assert_eq!(registry.count("e"), 1);
        registry.dispatch(&Event::new("e", Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handle_outlives_registry() {
        let registry = Arc::new(ListenerRegistry::new());
        let id = registry.add("e", Arc::new(|_: &Value| {}));
        let mut handle = ListenerHandle::new(&registry, "e".to_string(), id);

        drop(registry);
        // Must not panic with the registry gone.
        handle.remove();
    }

    #[test]
    fn test_listener_may_remove_itself_during_dispatch() {
        let registry = Arc::new(ListenerRegistry::new());
        let registry_clone = Arc::clone(&registry);
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let id_slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));
        let id_slot_clone = Arc::clone(&id_slot);

        let id = registry.add("e", Arc::new(move |_: &Value| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *id_slot_clone.lock() {
                registry_clone.remove("e", id);
            }
        }));
        *id_slot.lock() = Some(id);

        registry.dispatch(&Event::new("e", Value::Null));
        registry.dispatch(&Event::new("e", Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

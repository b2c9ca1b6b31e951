//! Change subscribers and their disposers.
//!
//! The registry sits behind its own lock so a callback can unsubscribe itself
//! (or anyone else) while a notification is in flight.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::attendance_store::AttendanceStore;

pub(crate) type Callback = Arc<dyn Fn(&AttendanceStore) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The store's list of change callbacks.
#[derive(Clone, Default)]
pub(crate) struct Subscribers {
    registry: Arc<Mutex<Registry>>,
}

impl Subscribers {
    pub(crate) fn add(&self, callback: Callback) -> Subscription {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push((id, callback));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Callbacks registered right now, in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Callback> {
        lock(&self.registry)
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }
}

/// Disposer returned by [`AttendanceStore::subscribe`].
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes exactly this subscription's callback.
    ///
    /// Returns true if the callback was still registered. Calling it again, or
    /// after the store is gone, does nothing and returns false.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };

        let mut registry = lock(&registry);
        let before = registry.entries.len();
        registry.entries.retain(|(id, _)| *id != self.id);
        registry.entries.len() != before
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Callback {
        Arc::new(|_: &AttendanceStore| {})
    }

    #[test]
    fn test_unsubscribe_removes_only_its_own_entry() {
        let subscribers = Subscribers::default();
        let first = subscribers.add(noop());
        let _second = subscribers.add(noop());
        assert_eq!(subscribers.len(), 2);

        assert!(first.unsubscribe());
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let subscribers = Subscribers::default();
        let first = subscribers.add(noop());
        let _second = subscribers.add(noop());

        assert!(first.unsubscribe());
        assert!(!first.unsubscribe());
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let subscribers = Subscribers::default();
        let subscription = subscribers.add(noop());
        drop(subscribers);
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let subscribers = Subscribers::default();
        let a = subscribers.add(noop());
        let b = subscribers.add(noop());
        assert!(a.id < b.id);
        assert_eq!(subscribers.snapshot().len(), 2);
    }
}

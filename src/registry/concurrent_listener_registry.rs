//! # Concurrent Listener Registry
//!
//! Thread-safe variant of the bounded listener registry.
//!
//! Same contract as [`ListenerRegistry`](crate::ListenerRegistry): bounded
//! growth, oldest-first eviction, snapshot-based notification. `add`,
//! `remove`, and `notify_all` may be called concurrently from independent
//! threads with no external locking - the shared state sits behind a
//! `parking_lot::RwLock` and every mutation is a single short exclusive-lock
//! section, so a notification snapshot always reflects one consistent
//! point-in-time view and can never observe a partially applied entry.
//!
//! Eviction order is the lock-serialized order in which concurrent adds
//! landed, and eviction fires at most once per add that pushes the registry
//! over capacity.

use crate::error::Result;
use crate::registry::listener_registry::{RegistryInner, RegistryStats};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Thread-safe listener registry for concurrent callers.
///
/// Notification callbacks run after the internal lock is released, so a
/// callback may re-enter `add`/`remove` on the same registry without
/// deadlocking.
pub struct ConcurrentListenerRegistry<L: ?Sized> {
    inner: RwLock<RegistryInner<L>>,
}

impl<L: ?Sized> ConcurrentListenerRegistry<L> {
    /// Create a registry with the given diagnostic name and capacity.
    /// A zero capacity is rejected.
    pub fn new(name: &str, max_capacity: usize) -> Result<Self> {
        let inner = RegistryInner::new(name, max_capacity)?;
        debug!(
            registry = %inner.name(),
            capacity = max_capacity,
            "created concurrent listener registry"
        );
        Ok(Self {
            inner: RwLock::new(inner),
        })
    }

    /// Register a listener, or refresh its registration if already present.
    /// Evicts the oldest registration when the add overflows capacity; the
    /// add itself always succeeds.
    pub fn add(&self, listener: Arc<L>) {
        self.inner.write().insert(listener);
    }

    /// Remove a listener if registered; no-op otherwise.
    pub fn remove(&self, listener: &Arc<L>) {
        self.inner.write().remove(listener);
    }

    /// Invoke `callback` once per listener present when the call started.
    ///
    /// The snapshot is cloned under the read lock and the lock is released
    /// before any callback runs: concurrent `add`/`remove` calls are never
    /// blocked for the duration of the fan-out, and modifications that land
    /// after the snapshot are not observed by this call.
    pub fn notify_all<F>(&self, mut callback: F)
    where
        F: FnMut(&Arc<L>),
    {
        let snapshot = self.inner.read().snapshot();
        for listener in &snapshot {
            callback(listener);
        }
    }

    /// Whether any listener is currently registered.
    pub fn has_listeners(&self) -> bool {
        self.inner.read().len() > 0
    }

    /// Whether the given listener is currently registered.
    pub fn contains(&self, listener: &Arc<L>) -> bool {
        self.inner.read().contains(listener)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().len() == 0
    }

    /// Clear all registrations. The registry is not meant to be reused
    /// afterwards.
    pub fn destroy(&self) {
        self.inner.write().clear();
    }

    /// Observability snapshot of the registry's counters.
    pub fn stats(&self) -> RegistryStats {
        self.inner.read().stats()
    }
}

impl<L: ?Sized> std::fmt::Debug for ConcurrentListenerRegistry<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ConcurrentListenerRegistry")
            .field("name", &inner.name())
            .field("size", &inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;

    #[test]
    fn test_basic_contract_matches_single_threaded_variant() {
        let registry: ConcurrentListenerRegistry<u32> =
            ConcurrentListenerRegistry::new("concurrent_test", 2).unwrap();
        let first = Arc::new(1);
        let second = Arc::new(2);

        registry.add(first.clone());
        registry.add(second.clone());
        registry.add(Arc::new(3));

        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(&first));
        assert!(registry.contains(&second));
        assert_eq!(registry.stats().evictions, 1);
    }

    #[test]
    fn test_concurrent_adds_lose_nothing_below_capacity() {
        let registry = Arc::new(
            ConcurrentListenerRegistry::<u64>::new("concurrent_adds", 256).unwrap(),
        );

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..32 {
                        registry.add(Arc::new(t * 100 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = registry.stats();
        assert_eq!(stats.size, 128);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_notify_runs_outside_the_lock() {
        let registry: ConcurrentListenerRegistry<u32> =
            ConcurrentListenerRegistry::new("reentrant", 8).unwrap();
        let listener = Arc::new(1);
        registry.add(listener.clone());

        // Would deadlock if the read lock were still held during callbacks
        registry.notify_all(|l| registry.remove(l));
        assert!(!registry.has_listeners());
    }

    #[test]
    fn test_notify_while_other_threads_mutate() {
        let registry = Arc::new(
            ConcurrentListenerRegistry::<u64>::new("mixed_load", 512).unwrap(),
        );
        let notified = Arc::new(AtomicU64::new(0));

        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..200 {
                    registry.add(Arc::new(i));
                }
            })
        };
        let notifier = {
            let registry = Arc::clone(&registry);
            let notified = Arc::clone(&notified);
            thread::spawn(move || {
                for _ in 0..50 {
                    registry.notify_all(|_| {
                        notified.fetch_add(1, Ordering::Relaxed);
                    });
                }
            })
        };

        writer.join().unwrap();
        notifier.join().unwrap();

        assert_eq!(registry.len(), 200);
        assert_eq!(registry.stats().evictions, 0);
    }
}

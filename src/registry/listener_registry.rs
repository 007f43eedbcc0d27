//! # Listener Registry
//!
//! Capacity-bounded listener set for single-threaded event fan-out.
//!
//! ## Overview
//!
//! The ListenerRegistry maintains an insertion-ordered mapping from listener
//! identity to registration timestamp. When an add would push the registry
//! over its configured capacity, the oldest registration is evicted and an
//! error diagnostic is emitted - runaway growth almost always means a caller
//! is leaking listeners, so eviction is a signal to operators, never a
//! failure returned to the caller.
//!
//! ## Key Features
//!
//! - **Bounded growth** with oldest-first eviction past `max_capacity`
//! - **High-water-mark tracking** to rate-limit near-capacity warnings
//! - **Identity semantics**: listeners are compared by `Arc` allocation,
//!   never by value
//! - **Re-entrant-safe notification** over an immutable snapshot, so a
//!   callback may remove its own listener mid-notification
//!
//! ## Usage
//!
//! ```rust
//! use listener_registry::ListenerRegistry;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), listener_registry::RegistryError> {
//! let registry: ListenerRegistry<String> = ListenerRegistry::new("task_events", 64)?;
//!
//! let listener = Arc::new("audit_hook".to_string());
//! registry.add(listener.clone());
//!
//! registry.notify_all(|l| println!("notifying {l}"));
//!
//! registry.remove(&listener);
//! assert!(!registry.has_listeners());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::error::{RegistryError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A registered listener paired with the instant it was registered.
pub struct Registration<L: ?Sized> {
    pub listener: Arc<L>,
    pub registered_at: DateTime<Utc>,
}

impl<L: ?Sized> Clone for Registration<L> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            registered_at: self.registered_at,
        }
    }
}

impl<L: ?Sized> std::fmt::Debug for Registration<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("listener", &"<Arc<L>>".to_string())
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// Bounded, insertion-ordered listener state shared by both registry
/// variants. All capacity, eviction, and diagnostic logic lives here; the
/// variants only differ in how they guard access to it.
pub(crate) struct RegistryInner<L: ?Sized> {
    /// Diagnostic name, used only in log output
    name: String,
    /// Hard bound on the number of registrations
    max_capacity: usize,
    /// Listener address -> registration, in insertion order (oldest first)
    registrations: IndexMap<usize, Registration<L>>,
    /// Largest size ever reached; monotonically non-decreasing
    high_water_mark: usize,
    evictions: u64,
    capacity_warnings: u64,
}

impl<L: ?Sized> RegistryInner<L> {
    pub(crate) fn new(name: &str, max_capacity: usize) -> Result<Self> {
        if max_capacity == 0 {
            return Err(RegistryError::InvalidCapacity {
                name: name.to_string(),
                capacity: max_capacity,
            });
        }
        Ok(Self {
            name: name.to_string(),
            max_capacity,
            registrations: IndexMap::new(),
            high_water_mark: 0,
            evictions: 0,
            capacity_warnings: 0,
        })
    }

    /// Listener identity is the `Arc` allocation address. Trait-object
    /// listeners carry a fat pointer, so the cast drops the metadata first.
    fn key(listener: &Arc<L>) -> usize {
        Arc::as_ptr(listener).cast::<()>() as usize
    }

    /// Insert or refresh a registration, evicting the oldest entry if the
    /// bound would otherwise be exceeded. Always succeeds.
    pub(crate) fn insert(&mut self, listener: Arc<L>) {
        let key = Self::key(&listener);
        let registered_at = Utc::now();

        // Re-registration refreshes the timestamp and moves the entry to the
        // back of the eviction order (re-insertion semantics).
        if self.registrations.shift_remove(&key).is_some() {
            debug!(
                registry = %self.name,
                "listener re-registered, refreshing registration"
            );
        }
        self.registrations.insert(
            key,
            Registration {
                listener,
                registered_at,
            },
        );

        if self.registrations.len() > self.max_capacity {
            if let Some((evicted_key, evicted)) = self.registrations.shift_remove_index(0) {
                self.evictions += 1;
                error!(
                    registry = %self.name,
                    listener_addr = evicted_key,
                    registered_at = %evicted.registered_at,
                    "capacity exceeded, evicted oldest listener (possible listener leak)"
                );
            }
        }

        let size = self.registrations.len();
        if size > self.high_water_mark {
            self.high_water_mark = size;
            // Integer form of size > 80% of capacity
            if size * 10 > self.max_capacity * 8 {
                self.capacity_warnings += 1;
                warn!(
                    registry = %self.name,
                    size,
                    capacity = self.max_capacity,
                    "listener count approaching capacity"
                );
            }
        }
    }

    /// Remove a registration if present; silent no-op otherwise.
    pub(crate) fn remove(&mut self, listener: &Arc<L>) {
        if self.registrations.shift_remove(&Self::key(listener)).is_some() {
            debug!(registry = %self.name, "listener removed");
        }
    }

    /// Immutable point-in-time copy of the registered listeners, in
    /// registration order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<L>> {
        self.registrations
            .values()
            .map(|r| Arc::clone(&r.listener))
            .collect()
    }

    pub(crate) fn contains(&self, listener: &Arc<L>) -> bool {
        self.registrations.contains_key(&Self::key(listener))
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn clear(&mut self) {
        self.registrations.clear();
        debug!(registry = %self.name, "registry destroyed, all listeners cleared");
    }

    pub(crate) fn stats(&self) -> RegistryStats {
        RegistryStats {
            name: self.name.clone(),
            size: self.registrations.len(),
            max_capacity: self.max_capacity,
            high_water_mark: self.high_water_mark,
            evictions: self.evictions,
            capacity_warnings: self.capacity_warnings,
        }
    }
}

/// Single-threaded listener registry.
///
/// All operations take `&self`; interior mutability lets a notification
/// callback re-enter `add`/`remove` on the registry that is notifying it.
/// The type is deliberately `!Sync` - it makes no thread-safety claims and
/// pays no synchronization cost. Multi-threaded callers use
/// [`ConcurrentListenerRegistry`](crate::ConcurrentListenerRegistry).
pub struct ListenerRegistry<L: ?Sized> {
    inner: RefCell<RegistryInner<L>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    /// Create a registry with the given diagnostic name and capacity.
    /// A zero capacity is rejected.
    pub fn new(name: &str, max_capacity: usize) -> Result<Self> {
        let inner = RegistryInner::new(name, max_capacity)?;
        debug!(
            registry = %inner.name,
            capacity = max_capacity,
            "created listener registry"
        );
        Ok(Self {
            inner: RefCell::new(inner),
        })
    }

    /// Register a listener, or refresh its registration if already present.
    ///
    /// The registry holds the listener strongly for as long as it is
    /// registered; callers release it with [`remove`](Self::remove) or
    /// [`destroy`](Self::destroy). If the add pushes the registry over
    /// capacity the oldest registration is evicted - the add itself always
    /// succeeds.
    pub fn add(&self, listener: Arc<L>) {
        self.inner.borrow_mut().insert(listener);
    }

    /// Remove a listener if registered; no-op otherwise.
    pub fn remove(&self, listener: &Arc<L>) {
        self.inner.borrow_mut().remove(listener);
    }

    /// Invoke `callback` once per registered listener, in registration order.
    ///
    /// Iterates a snapshot captured at the start of the call, so the callback
    /// may add or remove listeners (including its own) without faulting.
    /// Listeners added mid-call are not visited; listeners removed mid-call
    /// are still visited if they were present at the start.
    pub fn notify_all<F>(&self, mut callback: F)
    where
        F: FnMut(&Arc<L>),
    {
        let snapshot = self.inner.borrow().snapshot();
        for listener in &snapshot {
            callback(listener);
        }
    }

    /// Whether any listener is currently registered.
    pub fn has_listeners(&self) -> bool {
        self.inner.borrow().len() > 0
    }

    /// Whether the given listener is currently registered.
    pub fn contains(&self, listener: &Arc<L>) -> bool {
        self.inner.borrow().contains(listener)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().len() == 0
    }

    /// Clear all registrations. The registry is not meant to be reused
    /// afterwards.
    pub fn destroy(&self) {
        self.inner.borrow_mut().clear();
    }

    /// Observability snapshot of the registry's counters.
    pub fn stats(&self) -> RegistryStats {
        self.inner.borrow().stats()
    }
}

impl<L: ?Sized> std::fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ListenerRegistry")
            .field("name", &inner.name)
            .field("size", &inner.len())
            .field("max_capacity", &inner.max_capacity)
            .finish()
    }
}

/// Point-in-time statistics for a registry instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub name: String,
    pub size: usize,
    pub max_capacity: usize,
    pub high_water_mark: usize,
    /// Total oldest-entry evictions; each corresponds to one ERROR diagnostic
    pub evictions: u64,
    /// Total near-capacity warnings; at most one per new high-water-mark
    pub capacity_warnings: u64,
}

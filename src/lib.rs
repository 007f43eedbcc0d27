#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Listener Registry
//!
//! Capacity-bounded observer-pattern subscription management.
//!
//! ## Overview
//!
//! An application event source fans events out to registered listeners. Two
//! things routinely go wrong with that pattern at scale: listeners leak
//! (callers register and never unregister, so the set grows without bound),
//! and listeners mutate the set from inside a notification (typically by
//! unregistering themselves), faulting the iteration.
//!
//! This crate bounds the first problem and eliminates the second. A registry
//! holds listeners in insertion order up to a configured capacity; an add
//! that overflows the bound evicts the oldest registration and reports it
//! through the diagnostic channel as a likely leak. Notification iterates an
//! immutable snapshot, so callbacks may freely add and remove listeners
//! mid-fan-out.
//!
//! Capacity pressure is a **signal, not a failure**: every add, remove, and
//! notify succeeds, and operators watch the warn/error diagnostics instead.
//!
//! ## Module Organization
//!
//! - [`registry`] - both registry variants and their factory
//! - [`error`] - structured error handling
//! - [`logging`] - console tracing bootstrap
//!
//! ## Quick Start
//!
//! ```rust
//! use listener_registry::RegistryFactory;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), listener_registry::RegistryError> {
//! let factory = RegistryFactory::new();
//! let registry = factory.create_registry::<String>("task_events", 64)?;
//!
//! let listener = Arc::new("audit_hook".to_string());
//! registry.add(listener.clone());
//!
//! let mut notified = Vec::new();
//! registry.notify_all(|l| notified.push(Arc::clone(l)));
//! assert_eq!(notified.len(), 1);
//!
//! registry.remove(&listener);
//! assert!(!registry.has_listeners());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! For multi-threaded callers, `create_concurrent_registry` returns a variant
//! with the same contract that needs no external locking.

pub mod error;
pub mod logging;
pub mod registry;

pub use error::{RegistryError, Result};
pub use registry::{
    ConcurrentListenerRegistry, ListenerRegistry, Registration, RegistryFactory, RegistryStats,
};

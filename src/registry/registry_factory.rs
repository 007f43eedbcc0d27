//! # Registry Factory
//!
//! Construction point for both listener registry variants.
//!
//! The factory is a plain value handed to collaborators when they are built
//! (dependency injection). There is deliberately no process-wide default
//! instance and no global setter: a collaborator that needs registries is
//! given a `RegistryFactory` explicitly.

use crate::error::Result;
use crate::registry::concurrent_listener_registry::ConcurrentListenerRegistry;
use crate::registry::listener_registry::ListenerRegistry;
use tracing::debug;

/// Factory for creating listener registries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryFactory;

impl RegistryFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a single-threaded registry.
    ///
    /// `max_capacity` must be positive; zero is rejected with
    /// [`RegistryError::InvalidCapacity`](crate::RegistryError::InvalidCapacity).
    pub fn create_registry<L: ?Sized>(
        &self,
        name: &str,
        max_capacity: usize,
    ) -> Result<ListenerRegistry<L>> {
        let registry = ListenerRegistry::new(name, max_capacity)?;
        debug!(capacity = max_capacity, "factory created listener registry");
        Ok(registry)
    }

    /// Create a registry safe for concurrent callers.
    ///
    /// Same capacity validation as [`create_registry`](Self::create_registry).
    pub fn create_concurrent_registry<L: ?Sized>(
        &self,
        name: &str,
        max_capacity: usize,
    ) -> Result<ConcurrentListenerRegistry<L>> {
        let registry = ConcurrentListenerRegistry::new(name, max_capacity)?;
        debug!(
            capacity = max_capacity,
            "factory created concurrent listener registry"
        );
        Ok(registry)
    }
}

//! # Listener Registry Infrastructure
//!
//! Capacity-bounded listener registries for application event fan-out.
//!
//! ## Overview
//!
//! An event source owns one registry for its subscribers. The registry bounds
//! listener growth (evicting the oldest registration past capacity, which is
//! reported as a likely listener leak) and makes notification safe against
//! re-entrant mutation by iterating an immutable snapshot.
//!
//! ## Available Registries
//!
//! - **ListenerRegistry**: single-threaded variant, zero synchronization cost
//! - **ConcurrentListenerRegistry**: same contract for multi-threaded callers
//! - **RegistryFactory**: constructs either variant, validating capacity
//!
//! ## Architecture
//!
//! ```text
//! RegistryFactory
//! ├── ListenerRegistry              (RefCell<RegistryInner>, !Sync)
//! └── ConcurrentListenerRegistry    (RwLock<RegistryInner>)
//! ```

pub mod concurrent_listener_registry;
pub mod listener_registry;
pub mod registry_factory;

// Re-export main types for easy access
pub use concurrent_listener_registry::ConcurrentListenerRegistry;
pub use listener_registry::{ListenerRegistry, Registration, RegistryStats};
pub use registry_factory::RegistryFactory;

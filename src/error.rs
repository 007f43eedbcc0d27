//! Structured error handling.
//!
//! The error surface is deliberately minimal: registry operations are
//! infallible by contract (capacity pressure is a diagnostic signal, not a
//! failure), so the only thing that can go wrong is constructing a registry
//! with an unusable capacity.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry '{name}' configured with invalid capacity {capacity}: capacity must be a positive integer")]
    InvalidCapacity { name: String, capacity: usize },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

//! Core error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// A task with this id is already registered.
    #[error("Task already registered: {0}")]
    Duplicate(String),
}

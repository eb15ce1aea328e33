//! Profile error types.

use pauliq_core::CoreError;
use thiserror::Error;

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors from the profile registry, manager and configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// No strategy is registered under this name or alias.
    #[error("unknown profile '{name}' (available: {})", available.join(", "))]
    ProfileNotFound {
        /// Requested name.
        name: String,
        /// Canonical names that are registered.
        available: Vec<String>,
    },

    /// Layout parameters do not fit the register.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Underlying Hamiltonian or state error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

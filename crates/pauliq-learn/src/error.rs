//! Learning error types.

use pauliq_core::CoreError;
use thiserror::Error;

/// Result type for learning operations.
pub type LearnResult<T> = Result<T, LearnError>;

/// Errors that can occur while optimizing or fitting coefficients.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LearnError {
    /// Underlying Hamiltonian or state error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Fitting was called without data.
    #[error("need at least one measurement")]
    EmptyMeasurements,

    /// Optimizer settings out of range.
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    /// The iteration budget ran out above tolerance.
    #[error("did not converge after {iterations} iterations (best error {best_error:.3e})")]
    ConvergenceFailure {
        /// Smallest error seen.
        best_error: f64,
        /// Iterations performed.
        iterations: usize,
    },

    /// A model was refused at registration.
    #[error("model '{model}' rejected: {reason}")]
    ModelRejected {
        /// Model name.
        model: String,
        /// Why it was refused.
        reason: String,
    },
}

//! Error types for the core crate.

use thiserror::Error;

/// Errors produced while building or evaluating a Hamiltonian.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Qubit count is zero or too large for dense methods.
    #[error("qubit count must be between 1 and {max}, got {got}")]
    InvalidQubitCount {
        /// Requested qubit count.
        got: usize,
        /// Largest supported qubit count.
        max: usize,
    },

    /// An operator string or state vector does not match the register size.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length implied by the qubit count (string length or 2^n).
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A character outside {I, X, Y, Z} appeared in an operator string.
    #[error("invalid Pauli operator '{0}' (expected one of I, X, Y, Z)")]
    InvalidPauli(char),

    /// A qubit index past the end of the register.
    #[error("qubit {qubit} out of range for a {n_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register size.
        n_qubits: usize,
    },

    /// A basis label that is not a string of '0' and '1'.
    #[error("invalid basis label '{0}' (expected a bitstring such as \"0110\")")]
    InvalidBasisLabel(String),

    /// A basis-state index past the end of the Hilbert space.
    #[error("basis index {index} out of range for dimension {dim}")]
    InvalidBasisIndex {
        /// Requested index.
        index: usize,
        /// Hilbert-space dimension, `2^n`.
        dim: usize,
    },

    /// A state vector is not unit-norm within tolerance.
    #[error("state is not normalized: norm = {norm}")]
    Normalization {
        /// The offending Euclidean norm.
        norm: f64,
    },

    /// A term index past the end of the term list.
    #[error("term index {index} out of range for Hamiltonian with {n_terms} terms")]
    InvalidTermIndex {
        /// Requested index.
        index: usize,
        /// Number of terms present.
        n_terms: usize,
    },

    /// Coefficient is NaN or infinite.
    #[error("coefficient must be finite, got {0}")]
    NonFiniteCoefficient(f64),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

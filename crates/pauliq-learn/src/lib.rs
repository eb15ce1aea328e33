//! `pauliq-learn` - fitting Hamiltonian coefficients.
//!
//! - [`gradient`]: central finite differences of `⟨ψ|H|ψ⟩` with respect to
//!   term coefficients
//! - [`GradientDescent`]: drive an energy toward a target, or fit
//!   coefficients to `(state, energy)` measurements
//! - [`LearningLog`]: snapshots, expectation records and statistics; also a
//!   Hamiltonian observer that feeds [`IncrementalModel`]s
//!
//! # Example
//!
//! ```rust
//! use pauliq_core::QuantumState;
//! use pauliq_learn::{Measurement, learn_from_measurements};
//!
//! // Data from H = 0.7·ZI − 0.4·IZ
//! let data = vec![
//!     Measurement::new(QuantumState::from_bitstring("00").unwrap(), 0.3),
//!     Measurement::new(QuantumState::from_bitstring("01").unwrap(), 1.1),
//!     Measurement::new(QuantumState::from_bitstring("10").unwrap(), -1.1),
//! ];
//! let (fitted, run) = learn_from_measurements(&data, None).unwrap();
//! assert!(run.converged);
//! assert!((fitted.coefficients()[0] - 0.7).abs() < 1e-3);
//! ```

pub mod error;
pub mod gradient;
pub mod log;
pub mod model;
pub mod optimizer;
pub mod suggest;

pub use error::{LearnError, LearnResult};
pub use gradient::{finite_difference_gradient, gradient};
pub use log::{ExpectationRecord, HamiltonianSnapshot, LearningLog, LogSummary, Statistics};
pub use model::{IncrementalModel, LeastMeanSquares};
pub use optimizer::{
    GradientDescent, Measurement, OptimizationRun, OptimizerConfig, learn_from_measurements,
};
pub use suggest::suggest_term;

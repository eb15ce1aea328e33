//! `pauliq-core` - dense Pauli-sum Hamiltonians.
//!
//! A [`Hamiltonian`] is an ordered list of real-weighted Pauli strings on a
//! fixed register of up to [`MAX_QUBITS`] qubits. Its `2^n × 2^n` matrix is
//! assembled lazily and cached until the next mutation. On top of the matrix
//! this crate provides:
//!
//! - expectation values `⟨ψ|H|ψ⟩`
//! - unitary time evolution `exp(−iHt)|ψ⟩` (spectral or matrix exponential)
//! - ground state and spectrum by full Hermitian diagonalization
//! - a synchronous event channel for passive observers
//!
//! # Quick start
//!
//! ```rust
//! use pauliq_core::{Hamiltonian, QuantumState};
//!
//! let mut h = Hamiltonian::new(2).unwrap();
//! h.add_term(1.0, "ZI").unwrap();
//! h.add_term(1.0, "IZ").unwrap();
//!
//! let zero = QuantumState::zero(2).unwrap();
//! assert!((h.compute_energy(&zero).unwrap() - 2.0).abs() < 1e-12);
//!
//! let ground = h.ground_state().unwrap();
//! assert!((ground.energy + 2.0).abs() < 1e-12);
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod hamiltonian;
pub mod matrix;
pub mod pauli;
pub mod state;
pub mod term;

pub use engine::{EvolutionMethod, GroundState};
pub use error::{CoreError, CoreResult};
pub use events::{
    EventBus, HamiltonianEvent, HamiltonianObserver, RecordingObserver, TracingObserver,
};
pub use hamiltonian::Hamiltonian;
pub use matrix::{CacheState, MatrixCache};
pub use pauli::{PauliOp, PauliString};
pub use state::{NORM_TOLERANCE, QuantumState};
pub use term::Term;

/// Largest register supported by the dense representation.
pub const MAX_QUBITS: usize = 12;

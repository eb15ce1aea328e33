//! A named Hamiltonian together with a current state.

use std::fmt;

use num_complex::Complex64;
use pauliq_core::{CoreError, GroundState, Hamiltonian, QuantumState};

use crate::error::ProfileResult;
use crate::strategy::{ProfileParams, ProfileStrategy};

/// An instantiated profile: the strategy's Hamiltonian on a fixed register
/// and a current state, initially |0…0⟩.
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    motif: String,
    hamiltonian: Hamiltonian,
    state: QuantumState,
}

impl Profile {
    /// Build the strategy's Hamiltonian on `num_qubits`.
    pub fn from_strategy(
        strategy: &dyn ProfileStrategy,
        num_qubits: usize,
        params: &ProfileParams,
    ) -> ProfileResult<Self> {
        let terms = strategy.generate_terms(num_qubits, params)?;
        Ok(Self {
            name: strategy.name().to_string(),
            motif: strategy.motif().to_string(),
            hamiltonian: Hamiltonian::from_terms(num_qubits, terms)?,
            state: QuantumState::zero(num_qubits)?,
        })
    }

    /// Canonical strategy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strategy description.
    pub fn motif(&self) -> &str {
        &self.motif
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.hamiltonian.num_qubits()
    }

    /// The profile Hamiltonian.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// Mutable access, e.g. to add terms or optimize coefficients.
    pub fn hamiltonian_mut(&mut self) -> &mut Hamiltonian {
        &mut self.hamiltonian
    }

    /// Current state.
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Replace the current state, renormalizing away rounding drift.
    pub fn set_state(&mut self, state: QuantumState) -> ProfileResult<()> {
        if state.dim() != self.hamiltonian.dim() {
            return Err(CoreError::DimensionMismatch {
                expected: self.hamiltonian.dim(),
                actual: state.dim(),
            }
            .into());
        }
        self.state = QuantumState::normalized(state.amplitudes().as_slice().to_vec())?;
        Ok(())
    }

    /// Replace the current state from raw amplitudes, rescaling to unit
    /// norm.
    pub fn set_amplitudes(&mut self, amplitudes: Vec<Complex64>) -> ProfileResult<()> {
        if amplitudes.len() != self.hamiltonian.dim() {
            return Err(CoreError::DimensionMismatch {
                expected: self.hamiltonian.dim(),
                actual: amplitudes.len(),
            }
            .into());
        }
        self.state = QuantumState::normalized(amplitudes)?;
        Ok(())
    }

    /// Energy of `state`, or of the current state when `None`.
    pub fn compute_energy(&mut self, state: Option<&QuantumState>) -> ProfileResult<f64> {
        let state = state.unwrap_or(&self.state);
        Ok(self.hamiltonian.compute_energy(state)?)
    }

    /// Evolve the current state in place for time `t`.
    pub fn evolve(&mut self, t: f64) -> ProfileResult<&QuantumState> {
        self.state = self.hamiltonian.time_evolution(&self.state, t)?;
        Ok(&self.state)
    }

    /// Evolve `state` for time `t` without touching the current state.
    pub fn evolve_state(&mut self, state: &QuantumState, t: f64) -> ProfileResult<QuantumState> {
        Ok(self.hamiltonian.time_evolution(state, t)?)
    }

    /// Ground state of the profile Hamiltonian.
    pub fn ground_state(&mut self) -> ProfileResult<GroundState> {
        Ok(self.hamiltonian.ground_state()?)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} qubits, {} terms)",
            self.name,
            self.num_qubits(),
            self.hamiltonian.n_terms()
        )
    }
}

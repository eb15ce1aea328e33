//! Expectation values, unitary time evolution and ground states.
//!
//! All operations work on the dense matrix and scale with its dimension:
//! `O(4^n)` for an expectation value, `O(8^n)` for a full Hermitian
//! eigendecomposition or matrix exponential.
//!
//! # Time evolution
//!
//!   |ψ(t)⟩ = exp(−iHt) |ψ(0)⟩
//!
//! With `H = V diag(λ) V†` the spectral method applies
//! `V diag(e^{−iλt}) V† |ψ⟩` without forming `U(t)`;
//! [`EvolutionMethod::MatrixExponential`] forms `U(t)` directly.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DVector, Dyn, SymmetricEigen};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::events::HamiltonianEvent;
use crate::hamiltonian::Hamiltonian;
use crate::matrix::expectation;
use crate::state::{QuantumState, check_norm};

/// How `exp(−iHt)` is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvolutionMethod {
    /// Diagonalize H and apply phases in the eigenbasis.
    #[default]
    Spectral,
    /// Form `U(t)` with a dense matrix exponential.
    MatrixExponential,
}

impl FromStr for EvolutionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spectral" | "eigen" => Ok(EvolutionMethod::Spectral),
            "expm" | "matrix-exponential" | "exponential" => Ok(EvolutionMethod::MatrixExponential),
            other => Err(format!(
                "unknown evolution method '{other}' (expected spectral or expm)"
            )),
        }
    }
}

impl fmt::Display for EvolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvolutionMethod::Spectral => write!(f, "spectral"),
            EvolutionMethod::MatrixExponential => write!(f, "expm"),
        }
    }
}

/// Lowest eigenpair of a Hamiltonian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundState {
    /// Minimum eigenvalue.
    pub energy: f64,
    /// Corresponding unit eigenvector; the largest-magnitude amplitude is
    /// real and positive.
    pub state: QuantumState,
}

impl Hamiltonian {
    /// Expectation value `⟨ψ|H|ψ⟩`.
    ///
    /// Fails with [`CoreError::DimensionMismatch`] if the state length is
    /// not `2^n`, then with [`CoreError::Normalization`] if it is not
    /// unit-norm.
    pub fn compute_energy<S>(&mut self, state: &S) -> CoreResult<f64>
    where
        S: AsRef<[Complex64]> + ?Sized,
    {
        let psi = self.validate_state(state.as_ref())?;
        let energy = expectation(self.matrix(), &psi);
        self.events()
            .publish_with(|| HamiltonianEvent::EnergyComputed {
                energy,
                coefficients: self.coefficients(),
            });
        Ok(energy)
    }

    /// Evolve a state for time `t` with the default spectral method.
    pub fn time_evolution<S>(&mut self, state: &S, t: f64) -> CoreResult<QuantumState>
    where
        S: AsRef<[Complex64]> + ?Sized,
    {
        self.time_evolution_with(state, t, EvolutionMethod::Spectral)
    }

    /// Evolve a state for time `t`: `exp(−iHt)|ψ⟩`, renormalized.
    ///
    /// `t == 0` returns the input unchanged.
    pub fn time_evolution_with<S>(
        &mut self,
        state: &S,
        t: f64,
        method: EvolutionMethod,
    ) -> CoreResult<QuantumState>
    where
        S: AsRef<[Complex64]> + ?Sized,
    {
        let psi = self.validate_state(state.as_ref())?;
        let num_qubits = self.num_qubits();
        if t == 0.0 {
            self.events().publish_with(|| HamiltonianEvent::StateEvolved {
                time: t,
                norm_before_renormalization: psi.norm(),
            });
            return Ok(QuantumState::from_validated(num_qubits, psi));
        }

        let evolved = match method {
            EvolutionMethod::Spectral => {
                let eig = self.eigen();
                let coeffs = eig.eigenvectors.adjoint() * &psi;
                let phased = DVector::from_iterator(
                    coeffs.len(),
                    coeffs
                        .iter()
                        .zip(eig.eigenvalues.iter())
                        .map(|(c, &lambda)| c * Complex64::from_polar(1.0, -lambda * t)),
                );
                &eig.eigenvectors * phased
            }
            EvolutionMethod::MatrixExponential => {
                let generator = self.matrix() * Complex64::new(0.0, -t);
                generator.exp() * &psi
            }
        };

        let norm = evolved.norm();
        debug!(t, %method, drift = norm - 1.0, "evolved state");
        self.events().publish_with(|| HamiltonianEvent::StateEvolved {
            time: t,
            norm_before_renormalization: norm,
        });
        QuantumState::renormalize(num_qubits, evolved)
    }

    /// Minimum eigenvalue and its eigenvector.
    pub fn ground_state(&mut self) -> CoreResult<GroundState> {
        let num_qubits = self.num_qubits();
        let eig = self.eigen();
        let (index, energy) = eig
            .eigenvalues
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(CoreError::DimensionMismatch {
                expected: self.dim(),
                actual: 0,
            })?;

        let mut vector = eig.eigenvectors.column(index).into_owned();
        if let Some(pivot) = vector
            .iter()
            .copied()
            .max_by(|a, b| a.norm_sqr().total_cmp(&b.norm_sqr()))
        {
            let magnitude = pivot.norm();
            if magnitude > 0.0 {
                let phase = pivot.conj() / magnitude;
                vector *= phase;
            }
        }

        debug!(energy, n_qubits = num_qubits, "computed ground state");
        Ok(GroundState {
            energy,
            state: QuantumState::renormalize(num_qubits, vector)?,
        })
    }

    /// All eigenvalues in ascending order.
    pub fn spectrum(&mut self) -> Vec<f64> {
        let mut energies: Vec<f64> = self.eigen().eigenvalues.iter().copied().collect();
        energies.sort_by(f64::total_cmp);
        energies
    }

    /// Minimum eigenvalue.
    pub fn ground_state_energy(&mut self) -> f64 {
        self.spectrum().first().copied().unwrap_or(0.0)
    }

    /// `E₁ − E₀`; zero for a one-level spectrum.
    pub fn spectral_gap(&mut self) -> f64 {
        let energies = self.spectrum();
        match energies.as_slice() {
            [e0, e1, ..] => e1 - e0,
            _ => 0.0,
        }
    }

    fn eigen(&mut self) -> SymmetricEigen<Complex64, Dyn> {
        self.matrix().clone().symmetric_eigen()
    }

    fn validate_state(&self, amplitudes: &[Complex64]) -> CoreResult<DVector<Complex64>> {
        if amplitudes.len() != self.dim() {
            return Err(CoreError::DimensionMismatch {
                expected: self.dim(),
                actual: amplitudes.len(),
            });
        }
        let psi = DVector::from_column_slice(amplitudes);
        check_norm(psi.norm())?;
        Ok(psi)
    }
}

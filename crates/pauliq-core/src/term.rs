//! Weighted Pauli terms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pauli::{PauliOp, PauliString};

/// A single weighted Pauli term: `coefficient · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Real coefficient.
    pub coefficient: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl Term {
    /// Create a new term.
    pub fn new(coefficient: f64, pauli: PauliString) -> Self {
        Self { coefficient, pauli }
    }

    /// Parse the operator string and build a term.
    pub fn parse(coefficient: f64, operator: &str) -> CoreResult<Self> {
        Ok(Self::new(coefficient, operator.parse()?))
    }

    /// Shorthand: single-qubit term.
    pub fn single(
        n_qubits: usize,
        qubit: usize,
        op: PauliOp,
        coefficient: f64,
    ) -> CoreResult<Self> {
        Ok(Self::new(coefficient, PauliString::single(n_qubits, qubit, op)?))
    }

    /// Shorthand: two-qubit coupling with the same operator on both qubits.
    pub fn pair(
        n_qubits: usize,
        q0: usize,
        q1: usize,
        op: PauliOp,
        coefficient: f64,
    ) -> CoreResult<Self> {
        Ok(Self::new(coefficient, PauliString::pair(n_qubits, q0, q1, op)?))
    }

    /// Number of qubits spanned.
    pub fn n_qubits(&self) -> usize {
        self.pauli.len()
    }

    pub(crate) fn check_finite(&self) -> CoreResult<()> {
        if self.coefficient.is_finite() {
            Ok(())
        } else {
            Err(CoreError::NonFiniteCoefficient(self.coefficient))
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.4}*{}", self.coefficient, self.pauli)
    }
}

//! Unit-norm state vectors.
//!
//! Basis indices are big-endian: in the label "01" qubit 0 is `0` and
//! qubit 1 is `1`, giving index 1.

use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::MAX_QUBITS;
use crate::error::{CoreError, CoreResult};

/// Allowed deviation of `‖ψ‖` from 1.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// A normalized state on `n` qubits (`2^n` complex amplitudes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StateRepr", try_from = "StateRepr")]
pub struct QuantumState {
    num_qubits: usize,
    amplitudes: DVector<Complex64>,
}

impl QuantumState {
    /// The all-zeros basis state |0…0⟩.
    pub fn zero(num_qubits: usize) -> CoreResult<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Computational basis state with the given index.
    pub fn basis(num_qubits: usize, index: usize) -> CoreResult<Self> {
        let dim = checked_dimension(num_qubits)?;
        if index >= dim {
            return Err(CoreError::InvalidBasisIndex { index, dim });
        }
        let mut amplitudes = DVector::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Basis state from a big-endian label such as `"0110"`.
    pub fn from_bitstring(label: &str) -> CoreResult<Self> {
        if label.is_empty() || !label.chars().all(|c| c == '0' || c == '1') {
            return Err(CoreError::InvalidBasisLabel(label.to_string()));
        }
        let index = label
            .chars()
            .fold(0usize, |acc, c| (acc << 1) | usize::from(c == '1'));
        Self::basis(label.len(), index)
    }

    /// Equal superposition over all basis states.
    pub fn uniform(num_qubits: usize) -> CoreResult<Self> {
        let dim = checked_dimension(num_qubits)?;
        let amp = Complex64::new(1.0 / (dim as f64).sqrt(), 0.0);
        Ok(Self {
            num_qubits,
            amplitudes: DVector::from_element(dim, amp),
        })
    }

    /// Wrap amplitudes that must already be unit-norm.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> CoreResult<Self> {
        let num_qubits = qubits_for_len(amplitudes.len())?;
        let amplitudes = DVector::from_vec(amplitudes);
        check_norm(amplitudes.norm())?;
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Rescale arbitrary non-zero amplitudes to unit norm.
    pub fn normalized(amplitudes: Vec<Complex64>) -> CoreResult<Self> {
        let num_qubits = qubits_for_len(amplitudes.len())?;
        Self::renormalize(num_qubits, DVector::from_vec(amplitudes))
    }

    /// Wrap a vector whose length and norm were checked by the caller.
    pub(crate) fn from_validated(num_qubits: usize, amplitudes: DVector<Complex64>) -> Self {
        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Rescale to unit norm, failing on a zero or non-finite vector.
    pub(crate) fn renormalize(
        num_qubits: usize,
        amplitudes: DVector<Complex64>,
    ) -> CoreResult<Self> {
        let norm = amplitudes.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(CoreError::Normalization { norm });
        }
        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.unscale(norm),
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension, `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude vector.
    pub fn amplitudes(&self) -> &DVector<Complex64> {
        &self.amplitudes
    }

    /// Amplitude of one basis state.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Euclidean norm (1 up to rounding).
    pub fn norm(&self) -> f64 {
        self.amplitudes.norm()
    }

    /// ⟨self|other⟩.
    pub fn inner(&self, other: &QuantumState) -> CoreResult<Complex64> {
        if other.dim() != self.dim() {
            return Err(CoreError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(self.amplitudes.dotc(&other.amplitudes))
    }

    /// |⟨self|other⟩|².
    pub fn fidelity(&self, other: &QuantumState) -> CoreResult<f64> {
        Ok(self.inner(other)?.norm_sqr())
    }

    /// Measurement probabilities in the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Big-endian label of a basis index on this register.
    pub fn basis_label(&self, index: usize) -> String {
        format!("{index:0width$b}", width = self.num_qubits)
    }

    /// Consume into the raw amplitude vector.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes.iter().copied().collect()
    }
}

impl AsRef<[Complex64]> for QuantumState {
    fn as_ref(&self) -> &[Complex64] {
        self.amplitudes.as_slice()
    }
}

/// `2^n` for a supported qubit count.
pub(crate) fn checked_dimension(num_qubits: usize) -> CoreResult<usize> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(CoreError::InvalidQubitCount {
            got: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(1usize << num_qubits)
}

/// Fail with [`CoreError::Normalization`] if `norm` is not 1 within tolerance.
pub(crate) fn check_norm(norm: f64) -> CoreResult<()> {
    if (norm - 1.0).abs() > NORM_TOLERANCE || !norm.is_finite() {
        return Err(CoreError::Normalization { norm });
    }
    Ok(())
}

fn qubits_for_len(len: usize) -> CoreResult<usize> {
    if !len.is_power_of_two() || len < 2 {
        return Err(CoreError::DimensionMismatch {
            expected: len.next_power_of_two().max(2),
            actual: len,
        });
    }
    let n = len.trailing_zeros() as usize;
    checked_dimension(n)?;
    Ok(n)
}

/// Wire form: amplitudes as `[re, im]` pairs.
#[derive(Serialize, Deserialize)]
struct StateRepr {
    amplitudes: Vec<[f64; 2]>,
}

impl From<QuantumState> for StateRepr {
    fn from(state: QuantumState) -> Self {
        Self {
            amplitudes: state.amplitudes.iter().map(|a| [a.re, a.im]).collect(),
        }
    }
}

impl TryFrom<StateRepr> for QuantumState {
    type Error = CoreError;

    fn try_from(repr: StateRepr) -> Result<Self, Self::Error> {
        QuantumState::from_amplitudes(
            repr.amplitudes
                .into_iter()
                .map(|[re, im]| Complex64::new(re, im))
                .collect(),
        )
    }
}

//! Pauli operators and fixed-width Pauli strings.
//!
//! A [`PauliString`] stores one operator per qubit. Position 0 is the
//! leftmost (most-significant) tensor factor:
//!
//!   "XIZ"  ↦  X ⊗ I ⊗ Z
//!
//! and corresponds to the most-significant bit of a basis-state index, so
//! `Z` at position 0 acting on |10⟩ (index 2) yields −1.
//!
//! # Example
//!
//! ```rust
//! use pauliq_core::pauli::{PauliOp, PauliString};
//!
//! let ps: PauliString = "xIz".parse().unwrap();
//! assert_eq!(ps.to_string(), "XIZ");
//! assert_eq!(ps.weight(), 2);
//! assert_eq!(ps.get(2), Some(PauliOp::Z));
//! ```

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// All four operators, identity first.
    pub const ALL: [PauliOp; 4] = [PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z];

    /// Parse a single character, case-insensitively.
    pub fn from_char(c: char) -> CoreResult<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(PauliOp::I),
            'X' => Ok(PauliOp::X),
            'Y' => Ok(PauliOp::Y),
            'Z' => Ok(PauliOp::Z),
            _ => Err(CoreError::InvalidPauli(c)),
        }
    }

    /// Upper-case character for this operator.
    pub fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    /// The 2×2 matrix of this operator in the computational basis.
    pub fn matrix(self) -> DMatrix<Complex64> {
        let o = Complex64::new(0.0, 0.0);
        let l = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let entries = match self {
            PauliOp::I => [l, o, o, l],
            PauliOp::X => [o, l, l, o],
            PauliOp::Y => [o, -i, i, o],
            PauliOp::Z => [l, o, o, -l],
        };
        DMatrix::from_row_slice(2, 2, &entries)
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A tensor product of Pauli operators, one per qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PauliString {
    ops: Vec<PauliOp>,
}

impl PauliString {
    /// Build from an explicit operator list (position 0 = most significant).
    pub fn new(ops: Vec<PauliOp>) -> Self {
        Self { ops }
    }

    /// All-identity string on `n_qubits`.
    pub fn identity(n_qubits: usize) -> Self {
        Self {
            ops: vec![PauliOp::I; n_qubits],
        }
    }

    /// Place the given `(qubit, op)` pairs on an identity background.
    ///
    /// Later pairs overwrite earlier ones on the same qubit.
    pub fn with_ops(
        n_qubits: usize,
        ops: impl IntoIterator<Item = (usize, PauliOp)>,
    ) -> CoreResult<Self> {
        let mut ps = Self::identity(n_qubits);
        for (qubit, op) in ops {
            if qubit >= n_qubits {
                return Err(CoreError::QubitOutOfRange { qubit, n_qubits });
            }
            ps.ops[qubit] = op;
        }
        Ok(ps)
    }

    /// A single non-identity operator on `qubit`.
    pub fn single(n_qubits: usize, qubit: usize, op: PauliOp) -> CoreResult<Self> {
        Self::with_ops(n_qubits, [(qubit, op)])
    }

    /// The same operator on two qubits, e.g. `Z_i Z_j`.
    pub fn pair(n_qubits: usize, q0: usize, q1: usize, op: PauliOp) -> CoreResult<Self> {
        Self::with_ops(n_qubits, [(q0, op), (q1, op)])
    }

    /// A run of operators on consecutive qubits starting at `start`,
    /// e.g. `run(5, 1, &[X, Y, Z])` = "IXYZI".
    pub fn run(n_qubits: usize, start: usize, ops: &[PauliOp]) -> CoreResult<Self> {
        Self::with_ops(
            n_qubits,
            ops.iter().enumerate().map(|(k, &op)| (start + k, op)),
        )
    }

    /// Operators in qubit order.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// Operator on `qubit`, if in range.
    pub fn get(&self, qubit: usize) -> Option<PauliOp> {
        self.ops.get(qubit).copied()
    }

    /// Number of qubits this string spans.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True for the zero-width string.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> usize {
        self.ops.iter().filter(|op| **op != PauliOp::I).count()
    }

    /// True if every factor is the identity.
    pub fn is_identity(&self) -> bool {
        self.weight() == 0
    }
}

impl FromStr for PauliString {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ops = s
            .chars()
            .map(PauliOp::from_char)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { ops })
    }
}

impl TryFrom<String> for PauliString {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PauliString> for String {
    fn from(ps: PauliString) -> Self {
        ps.to_string()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

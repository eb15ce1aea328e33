//! Dense matrix assembly and the two-state matrix cache.
//!
//! Each term contributes
//!
//!   c_k · (σ_{k,0} ⊗ σ_{k,1} ⊗ … ⊗ σ_{k,n−1})
//!
//! built with Kronecker products from the left, so qubit 0 is the
//! most-significant factor. Real coefficients on self-adjoint Pauli
//! strings make the sum Hermitian by construction.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use tracing::trace;

use crate::pauli::PauliString;
use crate::term::Term;

/// Matrix of a single Pauli string, `2^n × 2^n`.
pub fn pauli_string_matrix(pauli: &PauliString) -> DMatrix<Complex64> {
    pauli
        .ops()
        .iter()
        .fold(DMatrix::identity(1, 1), |acc, op| acc.kronecker(&op.matrix()))
}

/// Assemble `Σ_k c_k P_k` on `n_qubits`. An empty term list gives the zero
/// matrix.
pub fn assemble(n_qubits: usize, terms: &[Term]) -> DMatrix<Complex64> {
    let dim = 1usize << n_qubits;
    let mut matrix = DMatrix::zeros(dim, dim);
    for term in terms {
        trace!(term = %term, "accumulating term matrix");
        matrix += pauli_string_matrix(&term.pauli) * Complex64::new(term.coefficient, 0.0);
    }
    matrix
}

/// True if `‖M − M†‖_max ≤ tol`.
pub fn is_hermitian(matrix: &DMatrix<Complex64>, tol: f64) -> bool {
    if !matrix.is_square() {
        return false;
    }
    let n = matrix.nrows();
    (0..n).all(|r| (r..n).all(|c| (matrix[(r, c)] - matrix[(c, r)].conj()).norm() <= tol))
}

/// `Re⟨ψ|M|ψ⟩` for an already-validated state.
pub(crate) fn expectation(matrix: &DMatrix<Complex64>, amplitudes: &DVector<Complex64>) -> f64 {
    let m_psi = matrix * amplitudes;
    amplitudes.dotc(&m_psi).re
}

/// Observable state of a [`MatrixCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Terms changed since the last build; the next read rebuilds.
    Dirty,
    /// The stored matrix matches the current terms.
    Valid,
}

/// Dense matrix cache with explicit invalidation.
///
/// `Dirty --invalidate--> Dirty`, `Dirty --get--> Valid` (rebuild),
/// `Valid --invalidate--> Dirty`, `Valid --get--> Valid` (no rebuild).
#[derive(Debug, Clone, Default)]
pub struct MatrixCache {
    // `Some` exactly when the cache is valid.
    matrix: Option<DMatrix<Complex64>>,
}

impl MatrixCache {
    /// An empty, dirty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CacheState {
        match self.matrix {
            Some(_) => CacheState::Valid,
            None => CacheState::Dirty,
        }
    }

    /// Drop the stored matrix.
    pub fn invalidate(&mut self) {
        self.matrix = None;
    }

    /// The stored matrix, if valid.
    pub fn get(&self) -> Option<&DMatrix<Complex64>> {
        self.matrix.as_ref()
    }

    /// Return the stored matrix, calling `build` first if dirty.
    ///
    /// The boolean is `true` when a rebuild happened.
    pub fn get_or_rebuild<F>(&mut self, build: F) -> (&DMatrix<Complex64>, bool)
    where
        F: FnOnce() -> DMatrix<Complex64>,
    {
        let rebuilt = self.matrix.is_none();
        (self.matrix.get_or_insert_with(build), rebuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_zi_diagonal_big_endian() {
        let m = assemble(2, &[Term::parse(1.0, "ZI").unwrap()]);
        let diag: Vec<f64> = m.diagonal().iter().map(|z| z.re).collect();
        assert_eq!(diag, vec![1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_iz_diagonal() {
        let m = assemble(2, &[Term::parse(1.0, "IZ").unwrap()]);
        let diag: Vec<f64> = m.diagonal().iter().map(|z| z.re).collect();
        assert_eq!(diag, vec![1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_xx_flips_both_bits() {
        let m = pauli_string_matrix(&"XX".parse().unwrap());
        // |00⟩ ↔ |11⟩, |01⟩ ↔ |10⟩
        assert_eq!(m[(3, 0)], c(1.0));
        assert_eq!(m[(2, 1)], c(1.0));
        assert_eq!(m[(0, 0)], c(0.0));
    }

    #[test]
    fn test_yy_real_entries() {
        // Y⊗Y = [[0,0,0,-1],[0,0,1,0],[0,1,0,0],[-1,0,0,0]]
        let m = pauli_string_matrix(&"YY".parse().unwrap());
        assert_relative_eq!(m[(0, 3)].re, -1.0);
        assert_relative_eq!(m[(1, 2)].re, 1.0);
        assert_relative_eq!(m[(0, 3)].im, 0.0);
    }

    #[test]
    fn test_empty_is_zero() {
        let m = assemble(3, &[]);
        assert_eq!(m.nrows(), 8);
        assert!(m.iter().all(|z| *z == c(0.0)));
    }

    #[test]
    fn test_cache_transitions() {
        let mut cache = MatrixCache::default();
        assert_eq!(cache.state(), CacheState::Dirty);

        let (_, rebuilt) = cache.get_or_rebuild(|| DMatrix::identity(2, 2));
        assert!(rebuilt);
        assert_eq!(cache.state(), CacheState::Valid);

        let (_, rebuilt) = cache.get_or_rebuild(|| panic!("must not rebuild"));
        assert!(!rebuilt);

        cache.invalidate();
        assert_eq!(cache.state(), CacheState::Dirty);
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_rebuild_returns_fresh_matrix() {
        let mut cache = MatrixCache::new();
        let (m, rebuilt) = cache.get_or_rebuild(|| DMatrix::identity(4, 4));
        assert!(rebuilt);
        assert_eq!(m.nrows(), 4);

        cache.invalidate();
        let (m, rebuilt) = cache.get_or_rebuild(|| DMatrix::zeros(2, 2));
        assert!(rebuilt);
        assert_eq!(m.nrows(), 2);
        assert_eq!(cache.get().map(|m| m.nrows()), Some(2));
    }
}

//! Profile strategies: pure functions from a register size to a term list.
//!
//! Every coefficient below is multiplied by [`ProfileParams::scale`].
//! "Neighbour pairs" are `(i, i+1)` on a chain, or the horizontal and
//! vertical neighbours of a row-major grid when [`ProfileParams::grid`] is
//! set.

use pauliq_core::{PauliOp, PauliString, Term};
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};

/// Tunable inputs shared by all strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileParams {
    /// Global multiplier on every coefficient.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// `(rows, cols)` grid layout; `None` means a linear chain.
    #[serde(default)]
    pub grid: Option<(usize, usize)>,
    /// Centre qubit for the hierarchical profile; `None` means `n / 2`.
    #[serde(default)]
    pub center: Option<usize>,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            grid: None,
            center: None,
        }
    }
}

impl ProfileParams {
    /// Set the scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Use a `rows × cols` grid for neighbour pairs.
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid = Some((rows, cols));
        self
    }

    /// Set the hierarchical centre.
    pub fn with_center(mut self, center: usize) -> Self {
        self.center = Some(center);
        self
    }

    /// Neighbour pairs for `num_qubits` under this layout.
    pub fn neighbour_pairs(&self, num_qubits: usize) -> ProfileResult<Vec<(usize, usize)>> {
        match self.grid {
            None => Ok((1..num_qubits).map(|i| (i - 1, i)).collect()),
            Some((rows, cols)) => {
                if rows.checked_mul(cols) != Some(num_qubits) {
                    return Err(ProfileError::InvalidLayout(format!(
                        "{rows}x{cols} grid does not fit {num_qubits} qubits"
                    )));
                }
                let mut pairs = Vec::new();
                for r in 0..rows {
                    for c in 0..cols {
                        let q = r * cols + c;
                        if c + 1 < cols {
                            pairs.push((q, q + 1));
                        }
                        if r + 1 < rows {
                            pairs.push((q, q + cols));
                        }
                    }
                }
                Ok(pairs)
            }
        }
    }

    fn check_scale(&self) -> ProfileResult<()> {
        if self.scale.is_finite() {
            Ok(())
        } else {
            Err(ProfileError::InvalidLayout(format!(
                "scale must be finite, got {}",
                self.scale
            )))
        }
    }
}

/// A named recipe for a characteristic Hamiltonian.
pub trait ProfileStrategy: Send + Sync {
    /// Canonical name.
    fn name(&self) -> &'static str;

    /// One-line description of the structure.
    fn motif(&self) -> &'static str;

    /// Terms for a register of `num_qubits`.
    fn generate_terms(&self, num_qubits: usize, params: &ProfileParams) -> ProfileResult<Vec<Term>>;
}

/// Accumulates scaled terms.
struct TermList {
    num_qubits: usize,
    scale: f64,
    terms: Vec<Term>,
}

impl TermList {
    fn new(num_qubits: usize, params: &ProfileParams) -> ProfileResult<Self> {
        params.check_scale()?;
        Ok(Self {
            num_qubits,
            scale: params.scale,
            terms: Vec::new(),
        })
    }

    fn single(&mut self, qubit: usize, op: PauliOp, coefficient: f64) -> ProfileResult<()> {
        self.push(coefficient, PauliString::single(self.num_qubits, qubit, op)?);
        Ok(())
    }

    fn pair(&mut self, q0: usize, q1: usize, op: PauliOp, coefficient: f64) -> ProfileResult<()> {
        self.push(coefficient, PauliString::pair(self.num_qubits, q0, q1, op)?);
        Ok(())
    }

    fn run(&mut self, start: usize, ops: &[PauliOp], coefficient: f64) -> ProfileResult<()> {
        self.push(coefficient, PauliString::run(self.num_qubits, start, ops)?);
        Ok(())
    }

    fn push(&mut self, coefficient: f64, pauli: PauliString) {
        self.terms.push(Term::new(coefficient * self.scale, pauli));
    }

    fn finish(self) -> Vec<Term> {
        self.terms
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// `X_i` 1.0 on every qubit, `Y_i` 0.5 on even qubits, `Z_iZ_j` 0.2 on
/// neighbour pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransverseField;

impl ProfileStrategy for TransverseField {
    fn name(&self) -> &'static str {
        "transverse-field"
    }

    fn motif(&self) -> &'static str {
        "transverse X field with Y phase terms and weak ZZ coupling"
    }

    fn generate_terms(&self, n: usize, params: &ProfileParams) -> ProfileResult<Vec<Term>> {
        let mut t = TermList::new(n, params)?;
        for i in 0..n {
            t.single(i, PauliOp::X, 1.0)?;
        }
        for i in (0..n).step_by(2) {
            t.single(i, PauliOp::Y, 0.5)?;
        }
        for (i, j) in params.neighbour_pairs(n)? {
            t.pair(i, j, PauliOp::Z, 0.2)?;
        }
        Ok(t.finish())
    }
}

/// `Z_i` 2.0 on every qubit, `Z_iZ_j` 1.5 on neighbour pairs, `X_i` 0.3 on
/// odd qubits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stabilizer;

impl ProfileStrategy for Stabilizer {
    fn name(&self) -> &'static str {
        "stabilizer"
    }

    fn motif(&self) -> &'static str {
        "strong Z fields and ZZ barriers with weak X tunnelling"
    }

    fn generate_terms(&self, n: usize, params: &ProfileParams) -> ProfileResult<Vec<Term>> {
        let mut t = TermList::new(n, params)?;
        for i in 0..n {
            t.single(i, PauliOp::Z, 2.0)?;
        }
        for (i, j) in params.neighbour_pairs(n)? {
            t.pair(i, j, PauliOp::Z, 1.5)?;
        }
        for i in (1..n).step_by(2) {
            t.single(i, PauliOp::X, 0.3)?;
        }
        Ok(t.finish())
    }
}

/// `Z_iZ_j` 0.5/n on every pair, `X_i` 0.8 on every qubit, `Y_i` 0.3 on
/// every third qubit.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllToAll;

impl ProfileStrategy for AllToAll {
    fn name(&self) -> &'static str {
        "all-to-all"
    }

    fn motif(&self) -> &'static str {
        "collective ZZ coupling between every pair with uniform X field"
    }

    fn generate_terms(&self, n: usize, params: &ProfileParams) -> ProfileResult<Vec<Term>> {
        let mut t = TermList::new(n, params)?;
        let coupling = 0.5 / n as f64;
        for i in 0..n {
            for j in (i + 1)..n {
                t.pair(i, j, PauliOp::Z, coupling)?;
            }
        }
        for i in 0..n {
            t.single(i, PauliOp::X, 0.8)?;
        }
        for i in (0..n).step_by(3) {
            t.single(i, PauliOp::Y, 0.3)?;
        }
        Ok(t.finish())
    }
}

/// `Z_c` 3.0 on the centre, `X_cX_{c±d}` 1.5/d radiating outward, and
/// `Z` 1.0 on both ends of the register.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hierarchical;

impl ProfileStrategy for Hierarchical {
    fn name(&self) -> &'static str {
        "hierarchical"
    }

    fn motif(&self) -> &'static str {
        "dominant central Z with XX couplings decaying from the centre"
    }

    fn generate_terms(&self, n: usize, params: &ProfileParams) -> ProfileResult<Vec<Term>> {
        let center = params.center.unwrap_or(n / 2);
        if center >= n {
            return Err(ProfileError::InvalidLayout(format!(
                "centre qubit {center} outside a {n}-qubit register"
            )));
        }

        let mut t = TermList::new(n, params)?;
        t.single(center, PauliOp::Z, 3.0)?;
        for d in 1..n.div_ceil(2) {
            let strength = 1.5 / d as f64;
            if let Some(left) = center.checked_sub(d) {
                t.pair(center, left, PauliOp::X, strength)?;
            }
            if center + d < n {
                t.pair(center, center + d, PauliOp::X, strength)?;
            }
        }
        // Both ends, even when n == 1.
        t.single(0, PauliOp::Z, 1.0)?;
        t.single(n - 1, PauliOp::Z, 1.0)?;
        Ok(t.finish())
    }
}

/// `X, Y, Z` 1/3 on every qubit, `XX, YY, ZZ` 0.7/3 on neighbour pairs and
/// `XYZ` 0.3 runs at the start, middle and end.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedMultibody;

impl ProfileStrategy for BalancedMultibody {
    fn name(&self) -> &'static str {
        "balanced-multibody"
    }

    fn motif(&self) -> &'static str {
        "all Pauli types at equal weight with nearest-neighbour and three-body terms"
    }

    fn generate_terms(&self, n: usize, params: &ProfileParams) -> ProfileResult<Vec<Term>> {
        const XYZ: [PauliOp; 3] = [PauliOp::X, PauliOp::Y, PauliOp::Z];

        let mut t = TermList::new(n, params)?;
        for i in 0..n {
            for op in XYZ {
                t.single(i, op, 1.0 / 3.0)?;
            }
        }
        for (i, j) in params.neighbour_pairs(n)? {
            for op in XYZ {
                t.pair(i, j, op, 0.7 / 3.0)?;
            }
        }
        if n >= 3 {
            let positions = [0, (n / 2).saturating_sub(1), n.saturating_sub(3)];
            for pos in positions {
                if pos + 2 < n {
                    t.run(pos, &XYZ, 0.3)?;
                }
            }
        }
        Ok(t.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(terms: &[Term]) -> Vec<String> {
        terms.iter().map(|t| t.pauli.to_string()).collect()
    }

    #[test]
    fn test_chain_pairs() {
        let pairs = ProfileParams::default().neighbour_pairs(4).unwrap();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_grid_pairs() {
        // 0 1 2
        // 3 4 5
        let pairs = ProfileParams::default()
            .with_grid(2, 3)
            .neighbour_pairs(6)
            .unwrap();
        assert_eq!(pairs.len(), 7);
        assert!(pairs.contains(&(0, 3)));
        assert!(pairs.contains(&(4, 5)));
        assert!(!pairs.contains(&(2, 3)));
    }

    #[test]
    fn test_grid_must_fit() {
        let err = ProfileParams::default()
            .with_grid(2, 2)
            .neighbour_pairs(5)
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidLayout(_)));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let err = ProfileParams::default()
            .with_grid(usize::MAX, 2)
            .neighbour_pairs(4)
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidLayout(_)));
    }

    #[test]
    fn test_transverse_field_three_qubits() {
        let terms = TransverseField
            .generate_terms(3, &ProfileParams::default())
            .unwrap();
        assert_eq!(
            labels(&terms),
            vec!["XII", "IXI", "IIX", "YII", "IIY", "ZZI", "IZZ"]
        );
        assert_eq!(terms[3].coefficient, 0.5);
        assert_eq!(terms[5].coefficient, 0.2);
    }

    #[test]
    fn test_hierarchical_four_qubits() {
        let terms = Hierarchical
            .generate_terms(4, &ProfileParams::default())
            .unwrap();
        // centre 2; d = 1 only
        assert_eq!(labels(&terms), vec!["IIZI", "IXXI", "IIXX", "ZIII", "IIIZ"]);
        assert_eq!(terms[0].coefficient, 3.0);
        assert_eq!(terms[1].coefficient, 1.5);
    }

    #[test]
    fn test_hierarchical_center_out_of_range() {
        let err = Hierarchical
            .generate_terms(3, &ProfileParams::default().with_center(3))
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidLayout(_)));
    }

    #[test]
    fn test_balanced_multibody_runs() {
        let terms = BalancedMultibody
            .generate_terms(5, &ProfileParams::default())
            .unwrap();
        let runs: Vec<String> = labels(&terms)
            .into_iter()
            .filter(|l| l.contains("XYZ"))
            .collect();
        // positions 0, 1, 2
        assert_eq!(runs, vec!["XYZII", "IXYZI", "IIXYZ"]);
        assert_eq!(terms.len(), 15 + 12 + 3);
    }

    #[test]
    fn test_scale_applies() {
        let terms = Stabilizer
            .generate_terms(2, &ProfileParams::default().with_scale(-2.0))
            .unwrap();
        assert_eq!(terms[0].coefficient, -4.0);
    }
}

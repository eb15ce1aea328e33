//! Hamiltonian: an ordered sum of weighted Pauli strings with a lazily
//! built dense matrix.
//!
//!   H = Σ_k  c_k · P_k,   c_k ∈ ℝ
//!
//! Every mutation marks the matrix cache dirty; [`Hamiltonian::matrix`] is
//! the single rebuild entry point.
//!
//! # Example
//!
//! ```rust
//! use pauliq_core::{CacheState, Hamiltonian};
//!
//! let mut h = Hamiltonian::new(2).unwrap();
//! h.add_term(1.0, "ZI").unwrap();
//! h.add_term(1.0, "IZ").unwrap();
//! assert_eq!(h.cache_state(), CacheState::Dirty);
//!
//! assert_eq!(h.matrix().nrows(), 4);
//! assert_eq!(h.cache_state(), CacheState::Valid);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::events::{EventBus, HamiltonianEvent, HamiltonianObserver};
use crate::matrix::{self, CacheState, MatrixCache};
use crate::pauli::PauliString;
use crate::state::checked_dimension;
use crate::term::Term;

/// A sum-of-Pauli-strings Hamiltonian on a fixed number of qubits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "HamiltonianRepr", try_from = "HamiltonianRepr")]
pub struct Hamiltonian {
    num_qubits: usize,
    terms: Vec<Term>,
    cache: MatrixCache,
    rebuilds: u64,
    events: EventBus,
}

impl Hamiltonian {
    /// Create an empty Hamiltonian on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> CoreResult<Self> {
        checked_dimension(num_qubits)?;
        Ok(Self {
            num_qubits,
            terms: Vec::new(),
            cache: MatrixCache::new(),
            rebuilds: 0,
            events: EventBus::new(),
        })
    }

    /// Create from a list of terms, validating each.
    pub fn from_terms(
        num_qubits: usize,
        terms: impl IntoIterator<Item = Term>,
    ) -> CoreResult<Self> {
        let mut h = Self::new(num_qubits)?;
        h.extend_terms(terms)?;
        Ok(h)
    }

    /// A fresh Hamiltonian with the same operators and coefficients but no
    /// observers and an empty cache.
    pub fn detached(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            terms: self.terms.clone(),
            cache: MatrixCache::new(),
            rebuilds: 0,
            events: EventBus::new(),
        }
    }

    /// Append `coefficient · operator`.
    ///
    /// Fails with [`CoreError::DimensionMismatch`] if the operator length is
    /// not `num_qubits`, or [`CoreError::InvalidPauli`] on a bad character.
    pub fn add_term(&mut self, coefficient: f64, operator: &str) -> CoreResult<()> {
        let pauli: PauliString = operator.parse()?;
        self.push_term(Term::new(coefficient, pauli))
    }

    /// Append an already-parsed term.
    pub fn push_term(&mut self, term: Term) -> CoreResult<()> {
        if term.n_qubits() != self.num_qubits {
            return Err(CoreError::DimensionMismatch {
                expected: self.num_qubits,
                actual: term.n_qubits(),
            });
        }
        term.check_finite()?;

        let index = self.terms.len();
        self.terms.push(term);
        self.cache.invalidate();
        self.events.publish_with(|| HamiltonianEvent::TermAdded {
            index,
            term: self.terms[index].clone(),
        });
        Ok(())
    }

    /// Append several terms; stops at the first invalid one.
    pub fn extend_terms(&mut self, terms: impl IntoIterator<Item = Term>) -> CoreResult<()> {
        for term in terms {
            self.push_term(term)?;
        }
        Ok(())
    }

    /// Replace the coefficient of term `index`, returning the old value.
    pub fn set_coefficient(&mut self, index: usize, value: f64) -> CoreResult<f64> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteCoefficient(value));
        }
        let n_terms = self.terms.len();
        let term = self
            .terms
            .get_mut(index)
            .ok_or(CoreError::InvalidTermIndex { index, n_terms })?;
        let old = std::mem::replace(&mut term.coefficient, value);
        self.cache.invalidate();
        self.events.publish_with(|| HamiltonianEvent::CoefficientChanged {
            index,
            old,
            new: value,
        });
        Ok(old)
    }

    /// Replace all coefficients at once.
    pub fn set_coefficients(&mut self, values: &[f64]) -> CoreResult<()> {
        if values.len() != self.terms.len() {
            return Err(CoreError::DimensionMismatch {
                expected: self.terms.len(),
                actual: values.len(),
            });
        }
        for (index, &value) in values.iter().enumerate() {
            self.set_coefficient(index, value)?;
        }
        Ok(())
    }

    /// Coefficients in term order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(|t| t.coefficient).collect()
    }

    /// All terms.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension, `2^n`.
    pub fn dim(&self) -> usize {
        1usize << self.num_qubits
    }

    /// Spectral norm upper bound: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coefficient.abs()).sum()
    }

    /// Merge terms with identical operator strings by summing their
    /// coefficients. Order follows first appearance.
    pub fn collect_like_terms(&self) -> Self {
        let mut order: Vec<PauliString> = Vec::new();
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for term in &self.terms {
            let key = term.pauli.to_string();
            if !sums.contains_key(&key) {
                order.push(term.pauli.clone());
            }
            *sums.entry(key).or_insert(0.0) += term.coefficient;
        }
        let terms = order
            .into_iter()
            .map(|pauli| {
                let coefficient = sums[&pauli.to_string()];
                Term::new(coefficient, pauli)
            })
            .collect();
        Self {
            num_qubits: self.num_qubits,
            terms,
            cache: MatrixCache::new(),
            rebuilds: 0,
            events: EventBus::new(),
        }
    }

    /// Dense `2^n × 2^n` matrix, rebuilt only if the cache is dirty.
    pub fn matrix(&mut self) -> &DMatrix<Complex64> {
        let (num_qubits, terms) = (self.num_qubits, &self.terms);
        let (matrix, rebuilt) = self
            .cache
            .get_or_rebuild(|| matrix::assemble(num_qubits, terms));
        if rebuilt {
            self.rebuilds += 1;
            debug!(
                n_qubits = num_qubits,
                n_terms = terms.len(),
                rebuilds = self.rebuilds,
                "rebuilt Hamiltonian matrix"
            );
            let dimension = matrix.nrows();
            self.events.publish_with(|| HamiltonianEvent::MatrixRebuilt {
                dimension,
                n_terms: terms.len(),
            });
        }
        matrix
    }

    /// Cache state.
    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    /// How many times the matrix has been assembled.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// True if the assembled matrix equals its conjugate transpose within `tol`.
    pub fn is_hermitian(&mut self, tol: f64) -> bool {
        matrix::is_hermitian(self.matrix(), tol)
    }

    /// Subscribe an observer to this Hamiltonian's events.
    pub fn subscribe(&mut self, observer: Arc<dyn HamiltonianObserver>) {
        self.events.subscribe(observer);
    }

    /// Number of subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "Hamiltonian({} qubits, 0 terms)", self.num_qubits);
        }
        write!(f, "Hamiltonian({} qubits):", self.num_qubits)?;
        for term in &self.terms {
            write!(f, " {term}")?;
        }
        Ok(())
    }
}

/// Wire form: qubit count and terms only.
#[derive(Serialize, Deserialize)]
struct HamiltonianRepr {
    num_qubits: usize,
    terms: Vec<Term>,
}

impl From<Hamiltonian> for HamiltonianRepr {
    fn from(h: Hamiltonian) -> Self {
        Self {
            num_qubits: h.num_qubits,
            terms: h.terms,
        }
    }
}

impl TryFrom<HamiltonianRepr> for Hamiltonian {
    type Error = CoreError;

    fn try_from(repr: HamiltonianRepr) -> Result<Self, Self::Error> {
        Hamiltonian::from_terms(repr.num_qubits, repr.terms)
    }
}

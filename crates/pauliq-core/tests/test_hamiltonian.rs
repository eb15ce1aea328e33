//! Tests for Hamiltonian construction, matrix caching and events.

use std::sync::Arc;

use pauliq_core::{
    CacheState, CoreError, Hamiltonian, HamiltonianEvent, QuantumState, RecordingObserver, Term,
};

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn new_hamiltonian_is_empty_and_dirty() {
    let h = Hamiltonian::new(3).unwrap();
    assert_eq!(h.n_terms(), 0);
    assert_eq!(h.dim(), 8);
    assert_eq!(h.cache_state(), CacheState::Dirty);
}

#[test]
fn too_many_qubits_rejected() {
    let err = Hamiltonian::new(pauliq_core::MAX_QUBITS + 1).unwrap_err();
    assert!(matches!(err, CoreError::InvalidQubitCount { .. }));
}

#[test]
fn invalid_operator_character() {
    let mut h = Hamiltonian::new(2).unwrap();
    assert_eq!(h.add_term(1.0, "XQ").unwrap_err(), CoreError::InvalidPauli('Q'));
    assert_eq!(h.n_terms(), 0);
}

#[test]
fn lowercase_operator_accepted() {
    let mut h = Hamiltonian::new(2).unwrap();
    h.add_term(1.0, "zx").unwrap();
    assert_eq!(h.terms()[0].pauli.to_string(), "ZX");
}

#[test]
fn from_terms_validates_each() {
    let err = Hamiltonian::from_terms(
        2,
        vec![Term::parse(1.0, "ZZ").unwrap(), Term::parse(1.0, "Z").unwrap()],
    )
    .unwrap_err();
    assert_eq!(
        err,
        CoreError::DimensionMismatch {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn identical_terms_sum() {
    let mut twice = Hamiltonian::new(2).unwrap();
    twice.add_term(0.5, "XY").unwrap();
    twice.add_term(0.5, "XY").unwrap();

    let mut once = Hamiltonian::new(2).unwrap();
    once.add_term(1.0, "XY").unwrap();

    assert_eq!(twice.matrix().clone(), once.matrix().clone());
}

#[test]
fn lambda_is_sum_of_abs_coefficients() {
    let mut h = Hamiltonian::new(2).unwrap();
    h.add_term(-1.0, "ZI").unwrap();
    h.add_term(0.5, "IZ").unwrap();
    h.add_term(-0.25, "ZZ").unwrap();
    assert!((h.lambda() - 1.75).abs() < 1e-15);
}

// ---------------------------------------------------------------------------
// Matrix cache
// ---------------------------------------------------------------------------

#[test]
fn matrix_is_cached_until_mutation() {
    let mut h = Hamiltonian::new(2).unwrap();
    h.add_term(1.0, "ZZ").unwrap();

    h.matrix();
    h.matrix();
    assert_eq!(h.rebuild_count(), 1);
    assert_eq!(h.cache_state(), CacheState::Valid);

    h.add_term(0.3, "XI").unwrap();
    assert_eq!(h.cache_state(), CacheState::Dirty);
    h.matrix();
    assert_eq!(h.rebuild_count(), 2);
}

#[test]
fn energy_reuses_cached_matrix() {
    let mut h = Hamiltonian::new(2).unwrap();
    h.add_term(1.0, "ZI").unwrap();
    let psi = QuantumState::zero(2).unwrap();
    for _ in 0..5 {
        h.compute_energy(&psi).unwrap();
    }
    assert_eq!(h.rebuild_count(), 1);
}

#[test]
fn assembled_matrix_is_hermitian() {
    let mut h = Hamiltonian::new(3).unwrap();
    h.add_term(0.3, "XYZ").unwrap();
    h.add_term(-1.2, "YYI").unwrap();
    h.add_term(0.7, "IZX").unwrap();
    assert!(h.is_hermitian(1e-12));
}

#[test]
fn empty_hamiltonian_gives_zero_energy() {
    let mut h = Hamiltonian::new(2).unwrap();
    let psi = QuantumState::uniform(2).unwrap();
    assert_eq!(h.compute_energy(&psi).unwrap(), 0.0);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[test]
fn observer_sees_mutations_and_rebuilds() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut h = Hamiltonian::new(1).unwrap();
    h.subscribe(recorder.clone());

    h.add_term(1.0, "Z").unwrap();
    h.set_coefficient(0, 2.0).unwrap();
    let psi = QuantumState::zero(1).unwrap();
    let energy = h.compute_energy(&psi).unwrap();

    let events = recorder.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].kind(), "term_added");
    assert_eq!(
        events[1],
        HamiltonianEvent::CoefficientChanged {
            index: 0,
            old: 1.0,
            new: 2.0
        }
    );
    assert_eq!(
        events[2],
        HamiltonianEvent::MatrixRebuilt {
            dimension: 2,
            n_terms: 1
        }
    );
    assert_eq!(
        events[3],
        HamiltonianEvent::EnergyComputed {
            energy,
            coefficients: vec![2.0]
        }
    );
}

#[test]
fn failed_mutation_publishes_nothing() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut h = Hamiltonian::new(2).unwrap();
    h.subscribe(recorder.clone());
    assert!(h.add_term(1.0, "Z").is_err());
    assert!(recorder.events().is_empty());
}

#[test]
fn detached_copy_has_no_observers() {
    let mut h = Hamiltonian::new(1).unwrap();
    h.subscribe(Arc::new(RecordingObserver::new()));
    h.add_term(1.0, "X").unwrap();
    let copy = h.detached();
    assert_eq!(copy.observer_count(), 0);
    assert_eq!(copy.coefficients(), vec![1.0]);
}

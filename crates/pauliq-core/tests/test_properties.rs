//! Property-based tests for assembly and evolution.
//!
//! Random Hamiltonians on 1-4 qubits with coefficients in [-2, 2], paired
//! with random complex unit states where a state is needed.

use nalgebra::DMatrix;
use num_complex::Complex64;
use pauliq_core::{EvolutionMethod, Hamiltonian, PauliOp, PauliString, QuantumState, Term};
use proptest::prelude::*;

fn arb_pauli(n_qubits: usize) -> impl Strategy<Value = PauliString> {
    prop::collection::vec(prop::sample::select(PauliOp::ALL.to_vec()), n_qubits)
        .prop_map(PauliString::new)
}

fn arb_terms(n_qubits: usize) -> impl Strategy<Value = Vec<Term>> {
    prop::collection::vec((-2.0_f64..2.0, arb_pauli(n_qubits)), 0..=6)
        .prop_map(|terms| terms.into_iter().map(|(c, p)| Term::new(c, p)).collect())
}

fn hamiltonian_on(n_qubits: usize) -> impl Strategy<Value = Hamiltonian> {
    arb_terms(n_qubits).prop_map(move |terms| {
        Hamiltonian::from_terms(n_qubits, terms).expect("generated terms match the register")
    })
}

fn arb_hamiltonian() -> impl Strategy<Value = Hamiltonian> {
    (1_usize..=4).prop_flat_map(hamiltonian_on)
}

fn unit_state_on(n_qubits: usize) -> impl Strategy<Value = QuantumState> {
    prop::collection::vec((-1.0_f64..1.0, -1.0_f64..1.0), 1 << n_qubits)
        .prop_filter("amplitudes must not all vanish", |amps| {
            amps.iter().any(|(re, im)| re.abs() + im.abs() > 1e-3)
        })
        .prop_map(|amps| {
            let amps = amps.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
            QuantumState::normalized(amps).expect("non-zero amplitudes")
        })
}

/// A Hamiltonian together with a state on the same register.
fn arb_system() -> impl Strategy<Value = (Hamiltonian, QuantumState)> {
    (1_usize..=4).prop_flat_map(|n| (hamiltonian_on(n), unit_state_on(n)))
}

fn max_abs_diff(a: &DMatrix<Complex64>, b: &DMatrix<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn assembled_matrix_is_hermitian(mut h in arb_hamiltonian()) {
        prop_assert!(h.is_hermitian(1e-12));
    }

    #[test]
    fn energy_is_bounded_by_lambda(mut h in arb_hamiltonian(), index in 0_usize..16) {
        let n = h.num_qubits();
        let psi = QuantumState::basis(n, index % (1 << n)).unwrap();
        let energy = h.compute_energy(&psi).unwrap();
        prop_assert!(energy.abs() <= h.lambda() + 1e-12);
    }

    #[test]
    fn evolution_keeps_unit_norm(mut h in arb_hamiltonian(), t in -3.0_f64..3.0) {
        let psi = QuantumState::uniform(h.num_qubits()).unwrap();
        let evolved = h.time_evolution(&psi, t).unwrap();
        prop_assert!((evolved.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ground_energy_is_spectrum_minimum(mut h in arb_hamiltonian()) {
        let gs = h.ground_state().unwrap();
        let spectrum = h.spectrum();
        prop_assert!((gs.energy - spectrum[0]).abs() < 1e-10);
        prop_assert!(spectrum[0] >= -h.lambda() - 1e-10);
    }

    #[test]
    fn no_state_lies_below_the_ground_energy((mut h, psi) in arb_system()) {
        let gs = h.ground_state().unwrap();
        let energy = h.compute_energy(&psi).unwrap();
        prop_assert!(energy >= gs.energy - 1e-10, "E = {energy} < E0 = {}", gs.energy);

        let at_ground = h.compute_energy(&gs.state).unwrap();
        prop_assert!((at_ground - gs.energy).abs() < 1e-10);
    }

    #[test]
    fn zero_time_evolution_is_identity((mut h, psi) in arb_system()) {
        for method in [EvolutionMethod::Spectral, EvolutionMethod::MatrixExponential] {
            let evolved = h.time_evolution_with(&psi, 0.0, method).unwrap();
            prop_assert_eq!(&evolved, &psi);
        }
    }

    #[test]
    fn evolution_methods_agree((mut h, psi) in arb_system(), t in -2.0_f64..2.0) {
        let spectral = h.time_evolution_with(&psi, t, EvolutionMethod::Spectral).unwrap();
        let expm = h
            .time_evolution_with(&psi, t, EvolutionMethod::MatrixExponential)
            .unwrap();
        prop_assert!(1.0 - spectral.fidelity(&expm).unwrap() < 1e-9);
    }

    #[test]
    fn duplicate_terms_equal_summed_coefficients(
        (n, terms) in (1_usize..=4).prop_flat_map(|n| (Just(n), arb_terms(n))),
        psi_index in 0_usize..16,
    ) {
        let doubled = terms.iter().chain(terms.iter()).cloned();
        let summed = terms
            .iter()
            .map(|t| Term::new(2.0 * t.coefficient, t.pauli.clone()));
        let mut with_duplicates = Hamiltonian::from_terms(n, doubled).unwrap();
        let mut with_sums = Hamiltonian::from_terms(n, summed).unwrap();
        let mut collected = with_duplicates.collect_like_terms();

        let reference = with_sums.matrix().clone();
        prop_assert!(max_abs_diff(with_duplicates.matrix(), &reference) < 1e-12);
        prop_assert!(max_abs_diff(collected.matrix(), &reference) < 1e-12);

        let psi = QuantumState::basis(n, psi_index % (1 << n)).unwrap();
        let a = with_duplicates.compute_energy(&psi).unwrap();
        let b = with_sums.compute_energy(&psi).unwrap();
        prop_assert!((a - b).abs() < 1e-12);
    }
}

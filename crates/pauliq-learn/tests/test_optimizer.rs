//! Tests for energy optimization and measurement fitting.

use std::sync::Arc;

use approx::assert_relative_eq;
use pauliq_core::{Hamiltonian, QuantumState};
use pauliq_learn::{
    GradientDescent, LearnError, LearningLog, LeastMeanSquares, Measurement, OptimizerConfig,
    learn_from_measurements,
};

fn two_z() -> Hamiltonian {
    let mut h = Hamiltonian::new(2).unwrap();
    h.add_term(1.0, "ZI").unwrap();
    h.add_term(1.0, "IZ").unwrap();
    h
}

fn measurements_of(h: &mut Hamiltonian, labels: &[&str]) -> Vec<Measurement> {
    labels
        .iter()
        .map(|label| {
            let state = QuantumState::from_bitstring(label).unwrap();
            let energy = h.compute_energy(&state).unwrap();
            Measurement::new(state, energy)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// optimize
// ---------------------------------------------------------------------------

#[test]
fn target_equal_to_current_energy_converges_immediately() {
    let mut h = two_z();
    let psi = QuantumState::zero(2).unwrap();
    let optimizer = GradientDescent::default();
    let run = optimizer.optimize(&mut h, &psi, 2.0).unwrap();

    assert!(run.converged);
    assert_eq!(run.iterations_used, 1);
    assert!(run.final_error < 1e-12);
    assert_eq!(h.coefficients(), vec![1.0, 1.0]);
}

#[test]
fn optimize_reaches_target() {
    let mut h = two_z();
    let psi = QuantumState::zero(2).unwrap();
    let config = OptimizerConfig::default().with_learning_rate(0.1);
    let optimizer = GradientDescent::new(config).unwrap();
    let run = optimizer.optimize(&mut h, &psi, 1.0).unwrap();

    assert!(run.converged);
    assert!(run.iterations_used < 30);
    assert!((h.compute_energy(&psi).unwrap() - 1.0).abs() < 1e-4);
    assert_eq!(run.error_history.len(), run.iterations_used);
    assert_eq!(run.target_energy, Some(1.0));
}

#[test]
fn exhausted_budget_is_not_an_error() {
    let mut h = two_z();
    let psi = QuantumState::zero(2).unwrap();
    let run = GradientDescent::default().optimize(&mut h, &psi, 1.0).unwrap();

    assert!(!run.converged);
    assert_eq!(run.iterations_used, 100);
    assert!(run.final_error > 1e-4);
    assert!(run.final_error < 1.0);
    assert!(run.best_error <= run.final_error);

    match run.into_result() {
        Err(LearnError::ConvergenceFailure { iterations, .. }) => assert_eq!(iterations, 100),
        other => panic!("expected ConvergenceFailure, got {other:?}"),
    }
}

#[test]
fn error_history_decreases() {
    let mut h = two_z();
    let psi = QuantumState::zero(2).unwrap();
    let run = GradientDescent::default().optimize(&mut h, &psi, 0.0).unwrap();
    assert!(run.error_history.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn optimize_snapshots_into_log() {
    let mut h = two_z();
    let psi = QuantumState::zero(2).unwrap();
    let log = LearningLog::new();
    let run = GradientDescent::default()
        .optimize_logged(&mut h, &psi, 1.0, Some(&log))
        .unwrap();

    // iterations 0, 10, ..., 90
    assert_eq!(log.snapshots().len(), 10);
    assert_eq!(log.snapshots()[0].metadata["iteration"], 0);
    assert_eq!(log.summary().training_iterations, run.iterations_used);
}

#[test]
fn dimension_mismatch_propagates() {
    let mut h = two_z();
    let psi = QuantumState::zero(3).unwrap();
    assert!(matches!(
        GradientDescent::default().optimize(&mut h, &psi, 0.0),
        Err(LearnError::Core(_))
    ));
}

// ---------------------------------------------------------------------------
// learn_from_measurements
// ---------------------------------------------------------------------------

#[test]
fn recovers_two_term_hamiltonian() {
    let mut truth = Hamiltonian::new(2).unwrap();
    truth.add_term(0.7, "ZI").unwrap();
    truth.add_term(-0.4, "IZ").unwrap();
    let data = measurements_of(&mut truth, &["00", "01", "10"]);

    let (fitted, run) = learn_from_measurements(&data, None).unwrap();
    assert!(run.converged);
    let c = fitted.coefficients();
    assert!(((c[0] - 0.7) / 0.7).abs() < 0.01);
    assert!(((c[1] + 0.4) / 0.4).abs() < 0.01);
}

#[test]
fn template_defines_basis_and_is_untouched() {
    let mut truth = Hamiltonian::new(2).unwrap();
    truth.add_term(0.5, "ZZ").unwrap();
    truth.add_term(-0.25, "ZI").unwrap();
    let data = measurements_of(&mut truth, &["00", "01", "10", "11"]);

    let mut template = Hamiltonian::new(2).unwrap();
    template.add_term(0.0, "ZZ").unwrap();
    template.add_term(0.0, "ZI").unwrap();

    let (fitted, run) = learn_from_measurements(&data, Some(&template)).unwrap();
    assert!(run.converged);
    assert_relative_eq!(fitted.coefficients()[0], 0.5, epsilon = 1e-4);
    assert_relative_eq!(fitted.coefficients()[1], -0.25, epsilon = 1e-4);
    assert_eq!(template.coefficients(), vec![0.0, 0.0]);
}

#[test]
fn empty_measurements_rejected() {
    assert_eq!(
        learn_from_measurements(&[], None).unwrap_err(),
        LearnError::EmptyMeasurements
    );
}

#[test]
fn mixed_dimensions_rejected() {
    let data = vec![
        Measurement::new(QuantumState::from_bitstring("00").unwrap(), 1.0),
        Measurement::new(QuantumState::from_bitstring("000").unwrap(), 1.0),
    ];
    assert!(matches!(
        learn_from_measurements(&data, None),
        Err(LearnError::Core(_))
    ));
}

// ---------------------------------------------------------------------------
// Learning log as observer
// ---------------------------------------------------------------------------

#[test]
fn log_trains_models_from_observed_energies() {
    let log = Arc::new(LearningLog::for_terms(2));
    log.register_model(Box::new(LeastMeanSquares::new(2, 0.05)))
        .unwrap();

    let mut h = two_z();
    h.subscribe(log.clone());
    let psi = QuantumState::zero(2).unwrap();
    GradientDescent::default().optimize(&mut h, &psi, 1.0).unwrap();

    assert!(log.summary().pending_samples > 0);
    let used = log.train_models().unwrap();
    assert!(used > 0);
    assert_eq!(log.summary().pending_samples, 0);
    assert_eq!(log.predict(&[1.0, 1.0]).unwrap().len(), 1);
}

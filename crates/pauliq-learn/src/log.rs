//! Learning log: Hamiltonian snapshots, expectation records and
//! training samples for registered models.
//!
//! A [`LearningLog`] is shared by reference. Subscribed to a Hamiltonian as
//! an observer it counts every event and keeps each `EnergyComputed`
//! notification as a `(coefficients, energy)` training sample. Pending
//! samples live in a bounded buffer; once full, the oldest sample is
//! dropped for each new one until [`LearningLog::train_models`] drains it.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use pauliq_core::{Hamiltonian, HamiltonianEvent, HamiltonianObserver, QuantumState, Term};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{LearnError, LearnResult};
use crate::model::IncrementalModel;

/// Default bound on pending training samples.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 4096;

/// A logged Hamiltonian configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HamiltonianSnapshot {
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Register size.
    pub num_qubits: usize,
    /// Terms at the time of logging.
    pub terms: Vec<Term>,
    /// Free-form metadata, e.g. `{"iteration": 10, "error": 0.5}`.
    pub metadata: Value,
}

/// A logged expectation value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationRecord {
    /// When the value was computed.
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied label.
    pub label: String,
    /// ⟨ψ|H|ψ⟩.
    pub value: f64,
    /// ‖ψ‖ of the state used.
    pub state_norm: f64,
    /// Free-form metadata.
    pub metadata: Value,
}

/// Summary statistics of logged expectation values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Number of values.
    pub count: usize,
}

impl Statistics {
    /// Statistics of a non-empty sample; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        Some(Self {
            mean,
            std: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count,
        })
    }
}

/// Activity summary of a [`LearningLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSummary {
    /// Expectation values recorded.
    pub total_measurements: usize,
    /// Optimizer iterations reported to the log.
    pub training_iterations: usize,
    /// Hamiltonian snapshots.
    pub hamiltonian_logs: usize,
    /// Expectation records.
    pub expectation_logs: usize,
    /// Observed events by kind.
    pub events: BTreeMap<String, u64>,
    /// Training samples waiting for [`LearningLog::train_models`].
    pub pending_samples: usize,
    /// Samples discarded because the pending buffer was full.
    pub dropped_samples: u64,
    /// Names of registered models.
    pub models: Vec<String>,
    /// Statistics over expectation values, if any.
    pub expectation_stats: Option<Statistics>,
}

struct LogState {
    snapshots: Vec<HamiltonianSnapshot>,
    expectations: Vec<ExpectationRecord>,
    training_iterations: usize,
    events: BTreeMap<String, u64>,
    samples: VecDeque<(Vec<f64>, f64)>,
    sample_capacity: usize,
    dropped_samples: u64,
    feature_dim: Option<usize>,
    models: Vec<Box<dyn IncrementalModel>>,
}

impl LogState {
    fn push_sample(&mut self, sample: (Vec<f64>, f64)) {
        if self.sample_capacity == 0 {
            self.dropped_samples += 1;
            return;
        }
        if self.samples.len() == self.sample_capacity {
            self.samples.pop_front();
            self.dropped_samples += 1;
        }
        self.samples.push_back(sample);
    }
}

impl Default for LogState {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            expectations: Vec::new(),
            training_iterations: 0,
            events: BTreeMap::new(),
            samples: VecDeque::new(),
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
            dropped_samples: 0,
            feature_dim: None,
            models: Vec::new(),
        }
    }
}

/// Thread-safe record of learning activity.
#[derive(Default)]
pub struct LearningLog {
    state: Mutex<LogState>,
}

impl LearningLog {
    /// Empty log accepting models of any feature width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` pending training samples.
    pub fn with_sample_capacity(self, capacity: usize) -> Self {
        {
            let mut state = self.lock();
            state.sample_capacity = capacity;
            while state.samples.len() > capacity {
                state.samples.pop_front();
                state.dropped_samples += 1;
            }
        }
        self
    }

    /// Empty log that only accepts models with `n_terms` features.
    pub fn for_terms(n_terms: usize) -> Self {
        let log = Self::new();
        log.lock().feature_dim = Some(n_terms);
        log
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the current terms of `hamiltonian`.
    pub fn log_hamiltonian(&self, hamiltonian: &Hamiltonian, metadata: Value) {
        let snapshot = HamiltonianSnapshot {
            timestamp: Utc::now(),
            num_qubits: hamiltonian.num_qubits(),
            terms: hamiltonian.terms().to_vec(),
            metadata,
        };
        self.lock().snapshots.push(snapshot);
    }

    /// Compute `⟨ψ|H|ψ⟩`, record it under `label`, and return it.
    pub fn log_expectation(
        &self,
        hamiltonian: &mut Hamiltonian,
        state: &QuantumState,
        label: &str,
        metadata: Value,
    ) -> LearnResult<f64> {
        let value = hamiltonian.compute_energy(state)?;
        let record = ExpectationRecord {
            timestamp: Utc::now(),
            label: label.to_string(),
            value,
            state_norm: state.norm(),
            metadata,
        };
        self.lock().expectations.push(record);
        Ok(value)
    }

    /// Add to the running count of optimizer iterations.
    pub fn record_iterations(&self, iterations: usize) {
        self.lock().training_iterations += iterations;
    }

    /// Copy of all snapshots.
    pub fn snapshots(&self) -> Vec<HamiltonianSnapshot> {
        self.lock().snapshots.clone()
    }

    /// Copy of all expectation records.
    pub fn expectations(&self) -> Vec<ExpectationRecord> {
        self.lock().expectations.clone()
    }

    /// Number of observed events of one kind.
    pub fn event_count(&self, kind: &str) -> u64 {
        self.lock().events.get(kind).copied().unwrap_or(0)
    }

    /// Statistics over recorded expectation values.
    pub fn statistics(&self) -> Option<Statistics> {
        let values: Vec<f64> = self.lock().expectations.iter().map(|r| r.value).collect();
        Statistics::from_values(&values)
    }

    /// Register a model. Its feature width must match the log's width; the
    /// first model fixes the width when none was set.
    pub fn register_model(&self, model: Box<dyn IncrementalModel>) -> LearnResult<()> {
        let mut state = self.lock();
        let width = model.feature_dim();
        if width == 0 {
            return Err(LearnError::ModelRejected {
                model: model.name().to_string(),
                reason: "feature dimension must be positive".to_string(),
            });
        }
        if let Some(expected) = state.feature_dim {
            if expected != width {
                return Err(LearnError::ModelRejected {
                    model: model.name().to_string(),
                    reason: format!("expects {width} features, log provides {expected}"),
                });
            }
        }
        debug!(model = model.name(), width, "registered model");
        state.feature_dim = Some(width);
        state.models.push(model);
        Ok(())
    }

    /// Feed pending samples to every model and clear them. Samples whose
    /// width differs from the registered width are dropped.
    ///
    /// Returns the number of samples used.
    pub fn train_models(&self) -> LearnResult<usize> {
        let mut state = self.lock();
        let samples = std::mem::take(&mut state.samples);
        let Some(width) = state.feature_dim else {
            return Ok(0);
        };
        let (features, labels): (Vec<Vec<f64>>, Vec<f64>) = samples
            .into_iter()
            .filter(|(x, _)| x.len() == width)
            .unzip();
        if features.is_empty() {
            return Ok(0);
        }
        for model in state.models.iter_mut() {
            model.incremental_fit(&features, &labels)?;
        }
        debug!(samples = labels.len(), models = state.models.len(), "trained models");
        Ok(labels.len())
    }

    /// Prediction of each registered model for `features`.
    pub fn predict(&self, features: &[f64]) -> LearnResult<Vec<(String, f64)>> {
        self.lock()
            .models
            .iter()
            .map(|m| -> LearnResult<(String, f64)> {
                Ok((m.name().to_string(), m.predict(features)?))
            })
            .collect()
    }

    /// Activity summary.
    pub fn summary(&self) -> LogSummary {
        let state = self.lock();
        let values: Vec<f64> = state.expectations.iter().map(|r| r.value).collect();
        LogSummary {
            total_measurements: state.expectations.len(),
            training_iterations: state.training_iterations,
            hamiltonian_logs: state.snapshots.len(),
            expectation_logs: state.expectations.len(),
            events: state.events.clone(),
            pending_samples: state.samples.len(),
            dropped_samples: state.dropped_samples,
            models: state.models.iter().map(|m| m.name().to_string()).collect(),
            expectation_stats: Statistics::from_values(&values),
        }
    }
}

impl HamiltonianObserver for LearningLog {
    fn on_event(&self, event: &HamiltonianEvent) {
        let mut state = self.lock();
        *state.events.entry(event.kind().to_string()).or_insert(0) += 1;
        if let HamiltonianEvent::EnergyComputed {
            energy,
            coefficients,
        } = event
        {
            state.push_sample((coefficients.clone(), *energy));
        }
    }
}

impl std::fmt::Debug for LearningLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("LearningLog")
            .field("snapshots", &state.snapshots.len())
            .field("expectations", &state.expectations.len())
            .field("samples", &state.samples.len())
            .field("models", &state.models.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LeastMeanSquares;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_statistics_population_std() {
        let stats = Statistics::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-15);
        assert!((stats.std - 1.25f64.sqrt()).abs() < 1e-15);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!(Statistics::from_values(&[]).is_none());
    }

    #[test]
    fn test_log_expectation_records_norm() {
        let log = LearningLog::new();
        let mut h = Hamiltonian::new(1).unwrap();
        h.add_term(1.0, "Z").unwrap();
        let psi = QuantumState::zero(1).unwrap();
        let value = log
            .log_expectation(&mut h, &psi, "zero-state", json!({"step": 1}))
            .unwrap();
        assert_eq!(value, 1.0);

        let records = log.expectations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "zero-state");
        assert!((records[0].state_norm - 1.0).abs() < 1e-12);
        assert_eq!(log.summary().total_measurements, 1);
    }

    #[test]
    fn test_observer_collects_samples() {
        let log = Arc::new(LearningLog::new());
        let mut h = Hamiltonian::new(1).unwrap();
        h.subscribe(log.clone());
        h.add_term(0.5, "Z").unwrap();
        h.compute_energy(&QuantumState::zero(1).unwrap()).unwrap();

        assert_eq!(log.event_count("term_added"), 1);
        assert_eq!(log.event_count("matrix_rebuilt"), 1);
        assert_eq!(log.event_count("energy_computed"), 1);
        assert_eq!(log.summary().pending_samples, 1);
    }

    #[test]
    fn test_pending_samples_are_bounded() {
        let log = Arc::new(LearningLog::new().with_sample_capacity(3));
        let mut h = Hamiltonian::new(1).unwrap();
        h.subscribe(log.clone());
        h.add_term(0.5, "Z").unwrap();
        let psi = QuantumState::zero(1).unwrap();
        for _ in 0..10 {
            h.compute_energy(&psi).unwrap();
        }

        let summary = log.summary();
        assert_eq!(summary.events["energy_computed"], 10);
        assert_eq!(summary.pending_samples, 3);
        assert_eq!(summary.dropped_samples, 7);
    }

    #[test]
    fn test_zero_capacity_keeps_no_samples() {
        let log = Arc::new(LearningLog::new().with_sample_capacity(0));
        let mut h = Hamiltonian::new(1).unwrap();
        h.subscribe(log.clone());
        h.add_term(1.0, "X").unwrap();
        h.compute_energy(&QuantumState::zero(1).unwrap()).unwrap();

        assert_eq!(log.summary().pending_samples, 0);
        assert_eq!(log.summary().dropped_samples, 1);
    }

    #[test]
    fn test_register_model_checks_width() {
        let log = LearningLog::for_terms(2);
        let err = log
            .register_model(Box::new(LeastMeanSquares::new(3, 0.1)))
            .unwrap_err();
        assert!(matches!(err, LearnError::ModelRejected { .. }));
        log.register_model(Box::new(LeastMeanSquares::new(2, 0.1)))
            .unwrap();
        assert_eq!(log.summary().models, vec!["least-mean-squares"]);
    }

    #[test]
    fn test_first_model_fixes_width() {
        let log = LearningLog::new();
        log.register_model(Box::new(LeastMeanSquares::new(2, 0.1)))
            .unwrap();
        assert!(log
            .register_model(Box::new(LeastMeanSquares::new(1, 0.1)))
            .is_err());
        assert!(log
            .register_model(Box::new(LeastMeanSquares::new(0, 0.1)))
            .is_err());
    }
}

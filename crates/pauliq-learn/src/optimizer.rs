//! Gradient descent on Hamiltonian coefficients.
//!
//! Two problems share one loop:
//!
//! - [`GradientDescent::optimize`] drives `E(ψ) = ⟨ψ|H|ψ⟩` toward a target
//!   energy by descending on `(E − target)²`.
//! - [`GradientDescent::fit`] fits coefficients to `(state, energy)`
//!   measurements by descending on the mean squared residual.
//!
//! Gradients are central finite differences (see [`crate::gradient`]). All
//! coefficients are updated together from one gradient evaluation.

use pauliq_core::{Hamiltonian, PauliOp, PauliString, QuantumState, Term};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{LearnError, LearnResult};
use crate::gradient::{energy_derivatives, gradient};
use crate::log::LearningLog;

/// Settings for [`GradientDescent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Step size η of the coefficient update.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Finite-difference step ε.
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    /// Stop once the error drops below this.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Snapshot the Hamiltonian into the log every this many iterations
    /// (0 disables snapshots).
    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

fn default_learning_rate() -> f64 {
    0.01
}

fn default_step_size() -> f64 {
    1e-5
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_max_iterations() -> usize {
    100
}

fn default_log_interval() -> usize {
    10
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            step_size: default_step_size(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            log_interval: default_log_interval(),
        }
    }
}

impl OptimizerConfig {
    /// Defaults for measurement fitting: η = 0.05, RMS tolerance 1e-7,
    /// 1000 iterations.
    pub fn fitting() -> Self {
        Self {
            learning_rate: 0.05,
            tolerance: 1e-7,
            max_iterations: 1000,
            ..Self::default()
        }
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the finite-difference step.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the snapshot interval.
    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Reject non-positive or non-finite settings.
    pub fn validate(&self) -> LearnResult<()> {
        let positive = |name: &str, v: f64| {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(LearnError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {v}"
                )))
            }
        };
        positive("learning_rate", self.learning_rate)?;
        positive("step_size", self.step_size)?;
        positive("tolerance", self.tolerance)?;
        if self.max_iterations == 0 {
            return Err(LearnError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one optimization or fitting run.
///
/// Running out of iterations is not an error: the run is returned with
/// `converged == false`. Use [`OptimizationRun::into_result`] to treat it as
/// one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRun {
    /// Target energy, or `None` for a measurement fit.
    pub target_energy: Option<f64>,
    /// Iteration budget.
    pub max_iterations: usize,
    /// Finite-difference step.
    pub step_size: f64,
    /// Learning rate.
    pub learning_rate: f64,
    /// Error at the start of each iteration.
    pub error_history: Vec<f64>,
    /// Whether the error dropped below tolerance.
    pub converged: bool,
    /// Error of the returned coefficients.
    pub final_error: f64,
    /// Smallest error seen.
    pub best_error: f64,
    /// Iterations performed.
    pub iterations_used: usize,
}

impl OptimizationRun {
    fn start(config: &OptimizerConfig, target_energy: Option<f64>) -> Self {
        Self {
            target_energy,
            max_iterations: config.max_iterations,
            step_size: config.step_size,
            learning_rate: config.learning_rate,
            error_history: Vec::new(),
            converged: false,
            final_error: f64::INFINITY,
            best_error: f64::INFINITY,
            iterations_used: 0,
        }
    }

    fn record(&mut self, error: f64) {
        self.error_history.push(error);
        self.best_error = self.best_error.min(error);
    }

    /// `Err(ConvergenceFailure)` if the run did not converge.
    pub fn into_result(self) -> LearnResult<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(LearnError::ConvergenceFailure {
                best_error: self.best_error,
                iterations: self.iterations_used,
            })
        }
    }
}

/// A measured `(state, energy)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Prepared state.
    pub state: QuantumState,
    /// Observed energy.
    pub energy: f64,
}

impl Measurement {
    /// Create a measurement.
    pub fn new(state: QuantumState, energy: f64) -> Self {
        Self { state, energy }
    }
}

/// Finite-difference gradient descent on term coefficients.
#[derive(Debug, Clone, Default)]
pub struct GradientDescent {
    config: OptimizerConfig,
}

impl GradientDescent {
    /// Create an optimizer, validating its settings.
    pub fn new(config: OptimizerConfig) -> LearnResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings in use.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Adjust the coefficients of `hamiltonian` in place so that
    /// `⟨ψ|H|ψ⟩` approaches `target_energy`.
    pub fn optimize(
        &self,
        hamiltonian: &mut Hamiltonian,
        state: &QuantumState,
        target_energy: f64,
    ) -> LearnResult<OptimizationRun> {
        self.optimize_logged(hamiltonian, state, target_energy, None)
    }

    /// As [`optimize`](Self::optimize), snapshotting into `log` every
    /// `log_interval` iterations.
    pub fn optimize_logged(
        &self,
        hamiltonian: &mut Hamiltonian,
        state: &QuantumState,
        target_energy: f64,
        log: Option<&LearningLog>,
    ) -> LearnResult<OptimizationRun> {
        let config = &self.config;
        let mut run = OptimizationRun::start(config, Some(target_energy));

        for iteration in 0..config.max_iterations {
            let energy = hamiltonian.compute_energy(state)?;
            let error = (energy - target_energy).abs();
            run.record(error);

            if error < config.tolerance {
                run.converged = true;
                run.final_error = error;
                run.iterations_used = iteration + 1;
                break;
            }

            let grad = gradient(hamiltonian, state, config.step_size)?;
            let scale = 2.0 * (energy - target_energy);
            let updated: Vec<f64> = hamiltonian
                .coefficients()
                .iter()
                .zip(&grad)
                .map(|(c, g)| c - config.learning_rate * scale * g)
                .collect();
            hamiltonian.set_coefficients(&updated)?;

            if config.log_interval > 0 && iteration % config.log_interval == 0 {
                debug!(iteration, energy, error, "optimizer progress");
                if let Some(log) = log {
                    let metadata = json!({"iteration": iteration, "error": error});
                    log.log_hamiltonian(hamiltonian, metadata);
                }
            }
        }

        if !run.converged {
            let energy = hamiltonian.compute_energy(state)?;
            run.final_error = (energy - target_energy).abs();
            run.best_error = run.best_error.min(run.final_error);
            run.iterations_used = config.max_iterations;
            warn!(
                iterations = run.iterations_used,
                final_error = run.final_error,
                "energy optimization did not converge"
            );
        }
        if let Some(log) = log {
            log.record_iterations(run.iterations_used);
        }
        Ok(run)
    }

    /// Fit a fresh Hamiltonian to `measurements`.
    ///
    /// The operator basis and initial coefficients come from `template`, or
    /// default to one `Z` per qubit with coefficient 1.0. The template is
    /// not modified. Convergence is judged on the RMS residual.
    pub fn fit(
        &self,
        measurements: &[Measurement],
        template: Option<&Hamiltonian>,
    ) -> LearnResult<(Hamiltonian, OptimizationRun)> {
        let first = measurements.first().ok_or(LearnError::EmptyMeasurements)?;
        let mut hamiltonian = match template {
            Some(t) => t.detached(),
            None => z_basis(first.state.num_qubits())?,
        };
        for m in measurements {
            if m.state.dim() != hamiltonian.dim() {
                return Err(pauliq_core::CoreError::DimensionMismatch {
                    expected: hamiltonian.dim(),
                    actual: m.state.dim(),
                }
                .into());
            }
        }

        let config = &self.config;
        let states: Vec<QuantumState> = measurements.iter().map(|m| m.state.clone()).collect();
        let targets: Vec<f64> = measurements.iter().map(|m| m.energy).collect();
        let count = measurements.len() as f64;
        let mut run = OptimizationRun::start(config, None);

        for iteration in 0..config.max_iterations {
            let residuals = residuals(&mut hamiltonian, &states, &targets)?;
            let rms = (residuals.iter().map(|r| r * r).sum::<f64>() / count).sqrt();
            run.record(rms);

            if rms < config.tolerance {
                run.converged = true;
                run.final_error = rms;
                run.iterations_used = iteration + 1;
                break;
            }

            // ∂/∂c_k of (1/m) Σ_j r_j² = (2/m) Σ_j r_j ∂E_j/∂c_k
            let mut updated = hamiltonian.coefficients();
            for (k, coefficient) in updated.iter_mut().enumerate() {
                let derivatives =
                    energy_derivatives(&mut hamiltonian, &states, k, config.step_size)?;
                let grad = 2.0 / count
                    * residuals
                        .iter()
                        .zip(&derivatives)
                        .map(|(r, d)| r * d)
                        .sum::<f64>();
                *coefficient -= config.learning_rate * grad;
            }
            hamiltonian.set_coefficients(&updated)?;

            if config.log_interval > 0 && iteration % config.log_interval == 0 {
                debug!(iteration, rms, "fit progress");
            }
        }

        if !run.converged {
            let residuals = residuals(&mut hamiltonian, &states, &targets)?;
            run.final_error = (residuals.iter().map(|r| r * r).sum::<f64>() / count).sqrt();
            run.best_error = run.best_error.min(run.final_error);
            run.iterations_used = config.max_iterations;
            warn!(
                iterations = run.iterations_used,
                rms = run.final_error,
                "measurement fit did not converge"
            );
        }
        Ok((hamiltonian, run))
    }
}

/// Fit with [`OptimizerConfig::fitting`] defaults.
pub fn learn_from_measurements(
    measurements: &[Measurement],
    template: Option<&Hamiltonian>,
) -> LearnResult<(Hamiltonian, OptimizationRun)> {
    GradientDescent::new(OptimizerConfig::fitting())?.fit(measurements, template)
}

/// `Z` on every qubit with coefficient 1.0.
fn z_basis(num_qubits: usize) -> LearnResult<Hamiltonian> {
    let terms = (0..num_qubits)
        .map(|q| -> LearnResult<Term> {
            Ok(Term::new(1.0, PauliString::single(num_qubits, q, PauliOp::Z)?))
        })
        .collect::<LearnResult<Vec<_>>>()?;
    Ok(Hamiltonian::from_terms(num_qubits, terms)?)
}

fn residuals(
    hamiltonian: &mut Hamiltonian,
    states: &[QuantumState],
    targets: &[f64],
) -> LearnResult<Vec<f64>> {
    states
        .iter()
        .zip(targets)
        .map(|(state, target)| -> LearnResult<f64> {
            Ok(hamiltonian.compute_energy(state)? - target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.step_size, 1e-5);
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.log_interval, 10);

        let fitting = OptimizerConfig::fitting();
        assert_eq!(fitting.learning_rate, 0.05);
        assert_eq!(fitting.tolerance, 1e-7);
        assert_eq!(fitting.max_iterations, 1000);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(OptimizerConfig::default().with_step_size(0.0).validate().is_err());
        assert!(OptimizerConfig::default().with_learning_rate(-1.0).validate().is_err());
        assert!(OptimizerConfig::default()
            .with_tolerance(f64::NAN)
            .validate()
            .is_err());
        assert!(OptimizerConfig::default().with_max_iterations(0).validate().is_err());
        assert!(GradientDescent::new(OptimizerConfig::default().with_learning_rate(0.0)).is_err());
    }

    #[test]
    fn test_into_result() {
        let mut run = OptimizationRun::start(&OptimizerConfig::default(), Some(1.0));
        run.record(0.5);
        run.iterations_used = 100;
        assert_eq!(
            run.clone().into_result().unwrap_err(),
            LearnError::ConvergenceFailure {
                best_error: 0.5,
                iterations: 100
            }
        );
        run.converged = true;
        assert!(run.into_result().is_ok());
    }

    #[test]
    fn test_z_basis() {
        let h = z_basis(3).unwrap();
        let ops: Vec<String> = h.terms().iter().map(|t| t.pauli.to_string()).collect();
        assert_eq!(ops, vec!["ZII", "IZI", "IIZ"]);
        assert_eq!(h.coefficients(), vec![1.0; 3]);
    }
}

//! Pluggable online models trained from logged `(coefficients, energy)`
//! samples.

use serde::{Deserialize, Serialize};

use crate::error::{LearnError, LearnResult};

/// A model that can be updated one batch at a time.
pub trait IncrementalModel: Send {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Expected length of each feature vector.
    fn feature_dim(&self) -> usize;

    /// Update the model with a batch of samples.
    fn incremental_fit(&mut self, features: &[Vec<f64>], labels: &[f64]) -> LearnResult<()>;

    /// Predict the label of one feature vector.
    fn predict(&self, features: &[f64]) -> LearnResult<f64>;
}

/// Online linear regression by the LMS rule:
///
///   w ← w + μ (y − w·x − b) x,   b ← b + μ (y − w·x − b)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeastMeanSquares {
    weights: Vec<f64>,
    bias: f64,
    learning_rate: f64,
    samples_seen: usize,
}

impl LeastMeanSquares {
    /// Zero-initialized regressor for `feature_dim` inputs.
    pub fn new(feature_dim: usize, learning_rate: f64) -> Self {
        Self {
            weights: vec![0.0; feature_dim],
            bias: 0.0,
            learning_rate,
            samples_seen: 0,
        }
    }

    /// Current weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Current bias.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Total samples consumed.
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    fn check_dim(&self, features: &[f64]) -> LearnResult<()> {
        if features.len() != self.weights.len() {
            return Err(LearnError::InvalidConfig(format!(
                "feature vector has length {}, model expects {}",
                features.len(),
                self.weights.len()
            )));
        }
        Ok(())
    }

    fn raw_predict(&self, features: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl IncrementalModel for LeastMeanSquares {
    fn name(&self) -> &str {
        "least-mean-squares"
    }

    fn feature_dim(&self) -> usize {
        self.weights.len()
    }

    fn incremental_fit(&mut self, features: &[Vec<f64>], labels: &[f64]) -> LearnResult<()> {
        if features.len() != labels.len() {
            return Err(LearnError::InvalidConfig(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        for (x, &y) in features.iter().zip(labels) {
            self.check_dim(x)?;
            let residual = y - self.raw_predict(x);
            for (w, xi) in self.weights.iter_mut().zip(x) {
                *w += self.learning_rate * residual * xi;
            }
            self.bias += self.learning_rate * residual;
            self.samples_seen += 1;
        }
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> LearnResult<f64> {
        self.check_dim(features)?;
        Ok(self.raw_predict(features))
    }
}

//! YAML configuration with environment overrides.
//!
//! Resolution order: built-in defaults, then the YAML file, then
//! `PAULIQ_*` environment variables.

use std::path::{Path, PathBuf};

use pauliq_core::MAX_QUBITS;
use pauliq_learn::OptimizerConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::registry::ProfileRegistry;
use crate::strategy::ProfileParams;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliqConfig {
    /// Profile active at start-up.
    #[serde(default = "default_profile")]
    pub default_profile: String,

    /// Register size for every profile.
    #[serde(default = "default_num_qubits")]
    pub num_qubits: usize,

    /// Parameters passed to every profile strategy.
    #[serde(default)]
    pub profile_params: ProfileParams,

    /// Gradient-descent settings.
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Default tracing filter level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_profile() -> String {
    "transverse-field".to_string()
}

fn default_num_qubits() -> usize {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PauliqConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile(),
            num_qubits: default_num_qubits(),
            profile_params: ProfileParams::default(),
            optimizer: OptimizerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl PauliqConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ProfileResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProfileError::Config(format!("{}: {e}", path.display())))?;

        let config: PauliqConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ProfileError::Config(format!("{}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `PAULIQ_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.merge_env();
        config
    }

    /// Apply `PAULIQ_*` environment variables on top of `self`.
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Values that fail to parse are ignored.
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = lookup("PAULIQ_PROFILE") {
            self.default_profile = profile;
        }
        if let Some(qubits) = lookup("PAULIQ_QUBITS") {
            if let Ok(val) = qubits.parse() {
                self.num_qubits = val;
            }
        }
        if let Some(level) = lookup("PAULIQ_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(rate) = lookup("PAULIQ_LEARNING_RATE") {
            if let Ok(val) = rate.parse() {
                self.optimizer.learning_rate = val;
            }
        }
        if let Some(max) = lookup("PAULIQ_MAX_ITERATIONS") {
            if let Ok(val) = max.parse() {
                self.optimizer.max_iterations = val;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.num_qubits == 0 || self.num_qubits > MAX_QUBITS {
            return Err(ProfileError::Config(format!(
                "num_qubits must be between 1 and {MAX_QUBITS}, got {}",
                self.num_qubits
            )));
        }

        ProfileRegistry::with_defaults().resolve(&self.default_profile)?;

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ProfileError::Config(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        if !self.profile_params.scale.is_finite() {
            return Err(ProfileError::Config(format!(
                "profile_params.scale must be finite, got {}",
                self.profile_params.scale
            )));
        }

        self.optimizer
            .validate()
            .map_err(|e| ProfileError::Config(e.to_string()))
    }

    /// `~/.pauliq/config.yaml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pauliq").join("config.yaml"))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when
    /// it exists, or fall back to defaults; then apply the environment.
    pub fn load(path: Option<&Path>) -> ProfileResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(p)?,
                None => Self::default(),
            },
        };
        config.merge_env();
        config.validate()?;
        Ok(config)
    }
}

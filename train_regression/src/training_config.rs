use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a training configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid configuration JSON
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration parameters for regression training.
///
/// Every field has a default, so a JSON file only needs the values it changes:
///
/// ```json
/// { "epochs": 50, "learning_rate": 0.05, "log_file": "runs/regression.txt" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training epochs
    pub epochs: usize,
    /// Size of each training batch
    pub batch_size: usize,
    /// Learning rate for gradient descent
    pub learning_rate: f64,
    /// Number of synthetic samples to generate
    pub samples: usize,
    /// Half-width of the uniform noise added to each target
    pub noise: f64,
    /// Seed for data generation and shuffling
    pub seed: u64,
    /// Slope of the line the data is drawn from
    pub target_slope: f64,
    /// Intercept of the line the data is drawn from
    pub target_intercept: f64,
    /// Number of epochs to wait for improvement before early stopping, 0 disables it
    pub early_stopping_patience: usize,
    /// Minimum decrease in loss required to reset patience counter
    pub early_stopping_min_delta: f64,
    /// File the epoch log is written to when training ends
    pub log_file: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            batch_size: 32,
            learning_rate: 0.1,
            samples: 1000,
            noise: 0.1,
            seed: 42,
            target_slope: 3.0,
            target_intercept: 2.0,
            early_stopping_patience: 5,
            early_stopping_min_delta: 1e-5,
            log_file: PathBuf::from("training_logs.txt"),
        }
    }
}

impl TrainingConfig {
    /// Loads a training configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        let config = serde_json::from_str(&config_str)?;
        Ok(config)
    }
}

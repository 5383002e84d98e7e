//! Training loop for a one-dimensional linear regression.
//!
//! This module provides:
//! - A `LinearModel` fitted by mini-batch gradient descent on mean squared error
//! - A `Trainer` that drives `TrainingObserver`s through the training lifecycle
//! - Early stopping when the loss plateaus
//! - Progress visualization using progress bars

use crate::dataset::{Dataset, Sample};
use crate::training_config::TrainingConfig;
use crate::training_history::TrainingHistory;
use epoch_logger::{LOSS, Metrics, ObserverError, ObserverSet, TrainingObserver};
use indicatif::style::TemplateError;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while training
#[derive(Debug, Error)]
pub enum TrainError {
    /// An observer failed while handling a lifecycle event
    #[error("Observer error: {0}")]
    Observer(#[from] ObserverError),
    #[error("Cannot train on an empty dataset")]
    EmptyDataset,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Progress bar template error: {0}")]
    Template(#[from] TemplateError),
}

/// `y = weight * x + bias`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearModel {
    pub weight: f64,
    pub bias: f64,
}

impl LinearModel {
    pub fn predict(&self, x: f64) -> f64 {
        self.weight * x + self.bias
    }

    /// Applies one gradient descent step on the batch and returns the summed
    /// squared error measured before the update.
    fn step(&mut self, batch: &[Sample], learning_rate: f64) -> f64 {
        if batch.is_empty() {
            return 0.0;
        }

        let (mut grad_weight, mut grad_bias, mut squared_error) = (0.0, 0.0, 0.0);
        for sample in batch {
            let error = self.predict(sample.x) - sample.y;
            grad_weight += error * sample.x;
            grad_bias += error;
            squared_error += error * error;
        }

        let scale = 2.0 / batch.len() as f64;
        self.weight -= learning_rate * scale * grad_weight;
        self.bias -= learning_rate * scale * grad_bias;
        squared_error
    }
}

/// Trainer manages the regression training process.
///
/// The trainer handles:
/// - Model initialization
/// - Training loop execution
/// - Lifecycle notifications to registered observers
/// - Early stopping
/// - Progress visualization
#[derive(Debug)]
pub struct Trainer {
    model: LinearModel,
    config: TrainingConfig,
    observers: ObserverSet,
}

impl Trainer {
    /// Creates a new trainer with a zero-initialised model.
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            model: LinearModel::default(),
            config,
            observers: ObserverSet::new(),
        }
    }

    /// Registers an observer; observers are notified in registration order.
    pub fn add_observer(&mut self, observer: Box<dyn TrainingObserver>) {
        self.observers.push(observer);
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains the model on `data`.
    ///
    /// Observers see `on_train_begin`, then `on_epoch_begin`/`on_epoch_end` for
    /// every epoch run, then `on_train_end` once, also when early stopping
    /// cuts training short. Epoch metrics carry `loss` (mean squared error over
    /// the epoch), `weight` and `bias`.
    ///
    /// # Errors
    ///
    /// Fails on an empty dataset or a zero batch size, and propagates the first
    /// observer error, which ends training immediately.
    pub fn train(&mut self, data: &Dataset) -> Result<TrainingHistory, TrainError> {
        if data.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        if self.config.batch_size == 0 {
            return Err(TrainError::InvalidConfig(
                "batch_size must be greater than zero".to_string(),
            ));
        }

        let multi_progress = MultiProgress::new();
        let epoch_progress = multi_progress.add(ProgressBar::new(self.config.epochs as u64));
        let batch_progress = multi_progress.add(ProgressBar::new(0));
        epoch_progress.set_style(create_progress_style(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} Epoch {msg}",
        )?);
        batch_progress.set_style(create_progress_style(
            "{spinner:.yellow} [{elapsed_precise}] {bar:40.yellow/blue} {pos:>7}/{len:7} Batch {msg}",
        )?);

        info!(
            samples = data.len(),
            epochs = self.config.epochs,
            batch_size = self.config.batch_size,
            observers = ?self.observers,
            "starting training"
        );

        let mut history = TrainingHistory::new();
        let mut indices: Vec<usize> = (0..data.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut best_loss = f64::INFINITY;
        let mut patience_counter = 0;

        self.observers.on_train_begin();

        for epoch in 0..self.config.epochs {
            self.observers.on_epoch_begin(epoch);
            indices.shuffle(&mut rng);

            batch_progress.set_length(indices.len().div_ceil(self.config.batch_size) as u64);
            batch_progress.set_position(0);
            batch_progress.set_message(format!("in Epoch {}", epoch + 1));

            let mut squared_error = 0.0;
            for batch_indices in indices.chunks(self.config.batch_size) {
                let batch: Vec<Sample> = batch_indices
                    .iter()
                    .filter_map(|&idx| data.samples().get(idx).copied())
                    .collect();
                squared_error += self.model.step(&batch, self.config.learning_rate);
                batch_progress.inc(1);
            }

            let epoch_loss = squared_error / data.len() as f64;
            history.record_epoch(epoch, epoch_loss);

            let metrics = Metrics::new()
                .with(LOSS, epoch_loss)
                .with("weight", self.model.weight)
                .with("bias", self.model.bias);
            self.observers.on_epoch_end(epoch, Some(&metrics))?;

            debug!(
                epoch = epoch + 1,
                loss = epoch_loss,
                weight = self.model.weight,
                bias = self.model.bias,
                "epoch complete"
            );
            epoch_progress.set_message(format!("- Loss: {:.4}", epoch_loss));
            epoch_progress.inc(1);

            // Early stopping check
            if epoch_loss < best_loss - self.config.early_stopping_min_delta {
                best_loss = epoch_loss;
                patience_counter = 0;
            } else if self.config.early_stopping_patience > 0 {
                patience_counter += 1;
                if patience_counter >= self.config.early_stopping_patience {
                    info!(epoch = epoch + 1, best_loss, "early stopping");
                    history.stopped_early = true;
                    break;
                }
            }
        }

        if history.stopped_early {
            epoch_progress.finish_with_message(format!(
                "Early stopping with best loss: {:.4}",
                history.best_loss
            ));
        } else {
            epoch_progress.finish_with_message("Training completed!");
        }
        batch_progress.finish_and_clear();

        self.observers.on_train_end()?;
        Ok(history)
    }
}

/// Creates a progress bar style with the specified template.
fn create_progress_style(template: &str) -> Result<ProgressStyle, TemplateError> {
    Ok(ProgressStyle::with_template(template)?.progress_chars("##-"))
}

mod dataset;
mod training;
mod training_config;
mod training_history;

use anyhow::{Context, Result};
use clap::Parser;
use dataset::Dataset;
use epoch_logger::EpochLogger;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use training::Trainer;
use training_config::TrainingConfig;

/// Fit a line to synthetic data and keep a per-epoch log on disk
#[derive(Parser, Debug)]
#[command(name = "train_regression", long_about = None)]
struct Args {
    /// JSON training configuration; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of training epochs
    #[arg(short, long)]
    epochs: Option<usize>,
    /// Learning rate for gradient descent
    #[arg(short = 'r', long)]
    learning_rate: Option<f64>,
    /// File the epoch log is written to when training ends
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    /// Seed for data generation and shuffling
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    /// Loads the configuration file, if any, and applies command line overrides.
    fn into_config(self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => TrainingConfig::default(),
        };

        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

fn run(config: TrainingConfig) -> Result<()> {
    println!("Generating {} training samples...", config.samples);
    let data = Dataset::synthetic(
        config.samples,
        config.target_slope,
        config.target_intercept,
        config.noise,
        config.seed,
    );

    let log_file = config.log_file.clone();
    let mut trainer = Trainer::new(config);
    trainer.add_observer(Box::new(EpochLogger::new(&log_file)));

    let history = trainer.train(&data).context("Training failed")?;
    history.print_summary();

    let model = trainer.model();
    println!(
        "\nFitted y = {:.4} * x + {:.4} (target y = {} * x + {})",
        model.weight,
        model.bias,
        trainer.config().target_slope,
        trainer.config().target_intercept
    );
    println!("Epoch log written to {}", log_file.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Args::parse().into_config()?;
    run(config)
}

/// Training history containing metrics recorded during training
#[derive(Debug, Clone)]
pub struct TrainingHistory {
    /// Mean loss for each completed epoch
    pub losses: Vec<f64>,
    /// Lowest loss seen during training
    pub best_loss: f64,
    /// Zero-based epoch where the best loss was seen
    pub best_epoch: usize,
    /// Whether training stopped before the configured number of epochs
    pub stopped_early: bool,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self {
            losses: Vec::new(),
            best_loss: f64::INFINITY,
            best_epoch: 0,
            stopped_early: false,
        }
    }

    pub fn record_epoch(&mut self, epoch: usize, loss: f64) {
        self.losses.push(loss);

        if loss < self.best_loss {
            self.best_loss = loss;
            self.best_epoch = epoch;
        }
    }

    pub fn epochs_run(&self) -> usize {
        self.losses.len()
    }

    /// Prints a summary of the training history
    pub fn print_summary(&self) {
        println!("\nTraining History Summary:");
        println!("------------------------");
        println!("Epochs run: {}", self.epochs_run());
        if self.stopped_early {
            println!("Stopped early: loss stopped improving");
        }
        println!(
            "Best loss: {:.6} (epoch {})",
            self.best_loss,
            self.best_epoch + 1
        );
        println!("Final loss: {:.6}", self.losses.last().unwrap_or(&0.0));
    }
}

impl Default for TrainingHistory {
    fn default() -> Self {
        Self::new()
    }
}

//! The capability a host training loop drives, plus a composite for fanning
//! events out to several observers.
//!
//! ```
//! use epoch_logger::{Metrics, ObserverError, ObserverSet, TrainingObserver};
//!
//! struct PrintLoss;
//!
//! impl TrainingObserver for PrintLoss {
//!     fn on_epoch_end(
//!         &mut self,
//!         epoch: usize,
//!         metrics: Option<&Metrics>,
//!     ) -> Result<(), ObserverError> {
//!         if let Some(loss) = metrics.and_then(Metrics::loss) {
//!             println!("epoch {} loss {:.4}", epoch + 1, loss);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut observers = ObserverSet::new();
//! observers.push(Box::new(PrintLoss));
//! observers.on_train_begin();
//! ```

use crate::error::ObserverError;
use crate::metrics::Metrics;
use std::fmt;

/// Receives lifecycle events from a training loop.
///
/// Every method has a no-op default, so implementors only override the
/// events they care about. Events arrive synchronously on the training thread.
pub trait TrainingObserver {
    /// Called once before the first epoch
    fn on_train_begin(&mut self) {}

    /// Called before each epoch with its zero-based index
    fn on_epoch_begin(&mut self, _epoch: usize) {}

    /// Called after each epoch with the metrics the host collected, if any
    fn on_epoch_end(
        &mut self,
        _epoch: usize,
        _metrics: Option<&Metrics>,
    ) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Called once after the last epoch
    fn on_train_end(&mut self) -> Result<(), ObserverError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "TrainingObserver"
    }
}

/// Observers dispatched in registration order.
///
/// A failing observer stops dispatch of that event; observers after it do not
/// see the event and the error is returned to the host.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn TrainingObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.observers.iter().map(|o| o.name()).collect()
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl TrainingObserver for ObserverSet {
    fn on_train_begin(&mut self) {
        for observer in &mut self.observers {
            observer.on_train_begin();
        }
    }

    fn on_epoch_begin(&mut self, epoch: usize) {
        for observer in &mut self.observers {
            observer.on_epoch_begin(epoch);
        }
    }

    fn on_epoch_end(
        &mut self,
        epoch: usize,
        metrics: Option<&Metrics>,
    ) -> Result<(), ObserverError> {
        for observer in &mut self.observers {
            observer.on_epoch_end(epoch, metrics)?;
        }
        Ok(())
    }

    fn on_train_end(&mut self) -> Result<(), ObserverError> {
        for observer in &mut self.observers {
            observer.on_train_end()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ObserverSet"
    }
}

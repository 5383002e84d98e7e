mod clock;
mod epoch_logger;
mod error;
mod log_entry;
mod metrics;
mod observer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use epoch_logger::EpochLogger;
pub use error::ObserverError;
pub use log_entry::LogEntry;
pub use metrics::{LOSS, Metrics};
pub use observer::{ObserverSet, TrainingObserver};

pub mod prelude {
    pub use crate::EpochLogger;
    pub use crate::Metrics;
    pub use crate::ObserverError;
    pub use crate::ObserverSet;
    pub use crate::TrainingObserver;
}

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by training observers while handling lifecycle events.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// A metric required to format a log entry was not reported by the host
    #[error("Missing metric: {key}")]
    MissingMetric { key: String },
    /// The training log could not be created, written or flushed
    #[error("IO error writing training log {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ObserverError {
    pub(crate) fn missing_metric(key: &str) -> Self {
        Self::MissingMetric {
            key: key.to_string(),
        }
    }
}

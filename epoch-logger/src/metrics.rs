//! Named numeric measurements reported by the host at the end of an epoch.

use std::collections::BTreeMap;

/// Key under which the host reports the epoch loss.
pub const LOSS: &str = "loss";

/// Metrics reported for a single epoch, keyed by name.
///
/// # Example
///
/// ```
/// use epoch_logger::Metrics;
///
/// let metrics = Metrics::from([("loss", 0.25), ("accuracy", 0.91)]);
/// assert_eq!(metrics.loss(), Some(0.25));
/// assert_eq!(metrics.get("accuracy"), Some(0.91));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    values: BTreeMap<String, f64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Shorthand for `get(LOSS)`.
    pub fn loss(&self) -> Option<f64> {
        self.get(LOSS)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Metrics {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

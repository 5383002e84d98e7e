//! Lines written to the training log.

use std::fmt;

/// Number of decimal places the loss is rounded to.
const LOSS_PRECISION: usize = 4;

/// Magnitude from which the loss is written in exponent form (`1e+16`).
const EXPONENT_THRESHOLD: f64 = 1e16;

/// A single line of the training log.
///
/// The `Display` impl produces the exact line text, without the trailing newline:
///
/// ```
/// use epoch_logger::LogEntry;
///
/// let entry = LogEntry::Epoch { epoch: 0, elapsed_secs: 12, loss: 0.123456 };
/// assert_eq!(entry.to_string(), "Epoch: 1 Time: 12s Loss: 0.1235");
///
/// let summary = LogEntry::Summary { elapsed_secs: 340 };
/// assert_eq!(summary.to_string(), "Total Training Time: 340s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogEntry {
    /// Summary of one completed epoch
    Epoch {
        /// Zero-based epoch index as reported by the host
        epoch: usize,
        /// Whole seconds spent in the epoch
        elapsed_secs: u64,
        loss: f64,
    },
    /// Final line of a run
    Summary {
        /// Whole seconds spent in the whole run
        elapsed_secs: u64,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epoch {
                epoch,
                elapsed_secs,
                loss,
            } => write!(
                f,
                "Epoch: {} Time: {}s Loss: {}",
                epoch.saturating_add(1),
                elapsed_secs,
                format_loss(*loss)
            ),
            Self::Summary { elapsed_secs } => write!(f, "Total Training Time: {}s", elapsed_secs),
        }
    }
}

/// Rounds `loss` to four decimal places and drops trailing zeros, keeping at
/// least one digit after the point (`0.5`, `2.0`, `0.1235`).
///
/// Magnitudes of `1e16` and above use the shortest exponent form with a signed
/// two-digit exponent (`1e+20`, `-2.5e+17`).
fn format_loss(loss: f64) -> String {
    if loss.is_nan() {
        return "nan".to_string();
    }
    if loss.is_infinite() {
        return if loss.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }
    if loss.abs() >= EXPONENT_THRESHOLD {
        return format_exponent(loss);
    }

    let fixed = format!("{:.*}", LOSS_PRECISION, loss);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn format_exponent(loss: f64) -> String {
    let shortest = format!("{:e}", loss);
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
            Some(digits) => format!("{}e-{:0>2}", mantissa, digits),
            None => format!("{}e+{:0>2}", mantissa, exponent),
        },
        None => shortest,
    }
}

//! Epoch logger for recovering training progress from a remote machine.
//!
//! The logger buffers one line per completed epoch and a final summary line,
//! then writes them to a plain text file when training ends:
//!
//! ```text
//! Epoch: 1 Time: 12s Loss: 0.6931
//! Epoch: 2 Time: 11s Loss: 0.4127
//! Total Training Time: 23s
//! ```
//!
//! The file is overwritten on every run. Lines buffered before `on_train_end`
//! are lost if the process dies.

use crate::clock::{Clock, SystemClock, elapsed_secs};
use crate::error::ObserverError;
use crate::log_entry::LogEntry;
use crate::metrics::{LOSS, Metrics};
use crate::observer::TrainingObserver;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Observer that writes per-epoch timing and loss to a text file.
///
/// # Example
///
/// ```no_run
/// use epoch_logger::{EpochLogger, Metrics, TrainingObserver};
///
/// let mut logger = EpochLogger::new("training_logs.txt");
/// logger.on_train_begin();
/// for epoch in 0..3 {
///     logger.on_epoch_begin(epoch);
///     // ... train ...
///     logger.on_epoch_end(epoch, Some(&Metrics::from([("loss", 0.25)])))?;
/// }
/// logger.on_train_end()?;
/// # Ok::<(), epoch_logger::ObserverError>(())
/// ```
#[derive(Debug)]
pub struct EpochLogger<C: Clock = SystemClock> {
    path: PathBuf,
    entries: Vec<LogEntry>,
    train_start: Instant,
    epoch_start: Option<Instant>,
    clock: C,
}

impl EpochLogger {
    /// Creates a logger that writes to `path` using the system clock.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> EpochLogger<C> {
    /// Creates a logger that reads time from `clock`.
    ///
    /// The training start is taken at construction, so a run that never
    /// reports `on_train_begin` is timed from here.
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        let train_start = clock.now();
        Self {
            path: path.into(),
            entries: Vec::new(),
            train_start,
            epoch_start: None,
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines buffered since the last reset or successful persist.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Writes all buffered lines to the target file, replacing its contents.
    ///
    /// The buffer is cleared only once the file has been written and flushed.
    /// On failure the lines stay buffered so the call can be repeated.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Io`] if the file cannot be created or written.
    pub fn persist(&mut self) -> Result<(), ObserverError> {
        self.write_entries().map_err(|source| ObserverError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(
            path = %self.path.display(),
            lines = self.entries.len(),
            "training log written"
        );
        self.entries.clear();
        Ok(())
    }

    fn write_entries(&self) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for entry in &self.entries {
            writeln!(writer, "{}", entry)?;
        }
        writer.flush()
    }
}

impl<C: Clock> TrainingObserver for EpochLogger<C> {
    fn on_train_begin(&mut self) {
        if !self.entries.is_empty() {
            debug!(
                discarded = self.entries.len(),
                "discarding unpersisted training log lines"
            );
        }
        self.entries.clear();
        self.epoch_start = None;
        self.train_start = self.clock.now();
    }

    fn on_epoch_begin(&mut self, _epoch: usize) {
        self.epoch_start = Some(self.clock.now());
    }

    fn on_epoch_end(
        &mut self,
        epoch: usize,
        metrics: Option<&Metrics>,
    ) -> Result<(), ObserverError> {
        let loss = metrics
            .and_then(Metrics::loss)
            .ok_or_else(|| ObserverError::missing_metric(LOSS))?;
        let started = self.epoch_start.unwrap_or(self.train_start);

        self.entries.push(LogEntry::Epoch {
            epoch,
            elapsed_secs: elapsed_secs(started, self.clock.now()),
            loss,
        });
        Ok(())
    }

    /// Appends the summary line and persists. A summary left over from a
    /// failed persist is replaced, so retrying never writes two summaries.
    fn on_train_end(&mut self) -> Result<(), ObserverError> {
        let summary = LogEntry::Summary {
            elapsed_secs: elapsed_secs(self.train_start, self.clock.now()),
        };
        if matches!(self.entries.last(), Some(LogEntry::Summary { .. })) {
            self.entries.pop();
        }
        self.entries.push(summary);
        self.persist()
    }

    fn name(&self) -> &str {
        "EpochLogger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::fs;
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn loss(value: f64) -> Metrics {
        Metrics::from([(LOSS, value)])
    }

    fn logger_in(dir: &TempDir) -> (EpochLogger<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let logger =
            EpochLogger::with_clock(dir.path().join("training_logs.txt"), clock.clone());
        (logger, clock)
    }

    fn read_lines(path: &Path) -> io::Result<Vec<String>> {
        Ok(fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect())
    }

    #[test]
    fn test_single_epoch_run() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);

        logger.on_train_begin();
        clock.advance(Duration::from_secs(1));
        logger.on_epoch_begin(0);
        clock.advance(Duration::from_secs(3));
        logger.on_epoch_end(0, Some(&loss(0.5)))?;
        clock.advance(Duration::from_secs(1));
        logger.on_train_end()?;

        assert_eq!(
            read_lines(logger.path())?,
            vec!["Epoch: 1 Time: 3s Loss: 0.5", "Total Training Time: 5s"]
        );
        assert!(logger.entries().is_empty());
        Ok(())
    }

    #[test]
    fn test_file_has_one_line_per_epoch_plus_summary() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);
        let losses = [0.9, 0.7, 0.55, 0.4321, 0.123456];

        logger.on_train_begin();
        for (epoch, value) in losses.iter().enumerate() {
            logger.on_epoch_begin(epoch);
            clock.advance(Duration::from_secs(2));
            logger.on_epoch_end(epoch, Some(&loss(*value)))?;
        }
        logger.on_train_end()?;

        let lines = read_lines(logger.path())?;
        assert_eq!(lines.len(), losses.len() + 1);
        assert_eq!(lines[0], "Epoch: 1 Time: 2s Loss: 0.9");
        assert_eq!(lines[3], "Epoch: 4 Time: 2s Loss: 0.4321");
        assert_eq!(lines[4], "Epoch: 5 Time: 2s Loss: 0.1235");
        assert_eq!(lines[5], "Total Training Time: 10s");
        Ok(())
    }

    #[test]
    fn test_epoch_time_is_truncated() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);

        logger.on_train_begin();
        logger.on_epoch_begin(0);
        clock.advance(Duration::from_millis(2999));
        logger.on_epoch_end(0, Some(&loss(1.0)))?;

        assert_eq!(
            logger.entries(),
            &[LogEntry::Epoch {
                epoch: 0,
                elapsed_secs: 2,
                loss: 1.0
            }]
        );
        Ok(())
    }

    #[test]
    fn test_train_begin_discards_buffered_entries() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);

        logger.on_train_begin();
        logger.on_epoch_begin(0);
        logger.on_epoch_end(0, Some(&loss(0.8)))?;
        assert_eq!(logger.entries().len(), 1);

        clock.advance(Duration::from_secs(30));
        logger.on_train_begin();
        assert!(logger.entries().is_empty());

        logger.on_train_end()?;
        assert_eq!(
            read_lines(logger.path())?,
            vec!["Total Training Time: 0s"]
        );
        Ok(())
    }

    #[test]
    fn test_missing_loss_appends_nothing() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, _clock) = logger_in(&dir);
        logger.on_train_begin();
        logger.on_epoch_begin(0);

        let metrics = Metrics::from([("accuracy", 0.9)]);
        let result = logger.on_epoch_end(0, Some(&metrics));
        assert!(matches!(
            result,
            Err(ObserverError::MissingMetric { ref key }) if key == "loss"
        ));

        let result = logger.on_epoch_end(0, None);
        assert!(matches!(result, Err(ObserverError::MissingMetric { .. })));

        assert!(logger.entries().is_empty());
        Ok(())
    }

    #[test]
    fn test_consecutive_runs_do_not_accumulate() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);

        logger.on_train_begin();
        for epoch in 0..3 {
            logger.on_epoch_begin(epoch);
            clock.advance(Duration::from_secs(1));
            logger.on_epoch_end(epoch, Some(&loss(0.3)))?;
        }
        logger.on_train_end()?;
        assert_eq!(read_lines(logger.path())?.len(), 4);

        logger.on_train_begin();
        logger.on_epoch_begin(0);
        clock.advance(Duration::from_secs(4));
        logger.on_epoch_end(0, Some(&loss(0.25)))?;
        logger.on_train_end()?;

        assert_eq!(
            read_lines(logger.path())?,
            vec!["Epoch: 1 Time: 4s Loss: 0.25", "Total Training Time: 4s"]
        );
        Ok(())
    }

    #[test]
    fn test_persist_overwrites_existing_file() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, _clock) = logger_in(&dir);
        fs::write(logger.path(), "stale line one\nstale line two\nstale line three\n")?;

        logger.on_train_begin();
        logger.on_train_end()?;

        assert_eq!(fs::read_to_string(logger.path())?, "Total Training Time: 0s\n");
        Ok(())
    }

    #[test]
    fn test_failed_persist_keeps_entries_for_retry() -> TestResult {
        let dir = tempdir()?;
        let clock = ManualClock::new();
        let log_dir = dir.path().join("not_yet_created");
        let mut logger = EpochLogger::with_clock(log_dir.join("run.txt"), clock.clone());

        logger.on_train_begin();
        logger.on_epoch_begin(0);
        clock.advance(Duration::from_secs(7));
        logger.on_epoch_end(0, Some(&loss(0.125)))?;

        let result = logger.on_train_end();
        assert!(matches!(result, Err(ObserverError::Io { .. })));
        assert_eq!(logger.entries().len(), 2);

        fs::create_dir(&log_dir)?;
        logger.persist()?;

        assert_eq!(
            read_lines(logger.path())?,
            vec!["Epoch: 1 Time: 7s Loss: 0.125", "Total Training Time: 7s"]
        );
        assert!(logger.entries().is_empty());
        Ok(())
    }

    #[test]
    fn test_train_end_retry_writes_single_summary() -> TestResult {
        let dir = tempdir()?;
        let clock = ManualClock::new();
        let log_dir = dir.path().join("not_yet_created");
        let mut logger = EpochLogger::with_clock(log_dir.join("run.txt"), clock.clone());

        logger.on_train_begin();
        logger.on_epoch_begin(0);
        clock.advance(Duration::from_secs(2));
        logger.on_epoch_end(0, Some(&loss(0.5)))?;

        assert!(logger.on_train_end().is_err());
        assert_eq!(logger.entries().len(), 2);

        fs::create_dir(&log_dir)?;
        clock.advance(Duration::from_secs(3));
        logger.on_train_end()?;

        assert_eq!(
            read_lines(logger.path())?,
            vec!["Epoch: 1 Time: 2s Loss: 0.5", "Total Training Time: 5s"]
        );
        assert!(logger.entries().is_empty());
        Ok(())
    }

    #[test]
    fn test_epoch_end_without_begin_times_from_train_start() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);

        logger.on_train_begin();
        clock.advance(Duration::from_secs(6));
        logger.on_epoch_end(0, Some(&loss(0.5)))?;

        assert_eq!(logger.entries()[0].to_string(), "Epoch: 1 Time: 6s Loss: 0.5");
        Ok(())
    }

    #[test]
    fn test_train_end_without_begin_times_from_construction() -> TestResult {
        let dir = tempdir()?;
        let (mut logger, clock) = logger_in(&dir);

        clock.advance(Duration::from_secs(42));
        logger.on_train_end()?;

        assert_eq!(
            read_lines(logger.path())?,
            vec!["Total Training Time: 42s"]
        );
        Ok(())
    }

    #[test]
    fn test_system_clock_logger_writes_file() -> TestResult {
        let dir = tempdir()?;
        let mut logger = EpochLogger::new(dir.path().join("system.txt"));
        assert_eq!(logger.name(), "EpochLogger");

        logger.on_train_begin();
        logger.on_epoch_begin(0);
        logger.on_epoch_end(0, Some(&loss(0.75)))?;
        logger.on_train_end()?;

        let lines = read_lines(logger.path())?;
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Epoch: 1 Time: "));
        assert!(lines[0].ends_with("s Loss: 0.75"));
        assert!(lines[1].starts_with("Total Training Time: "));
        Ok(())
    }
}

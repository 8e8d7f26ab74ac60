//! `log` backend that prints above active progress bars
//!
//! Lines go through [`MultiProgress::println`] while progress bars are shown so
//! they do not tear the bar display, and straight to stderr otherwise.

use crate::io::error::{AlgorithmError, Result};
use indicatif::MultiProgress;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fmt;
use std::time::{Duration, Instant};

/// Logger writing timestamped lines to stderr or a progress display
pub struct ProgressLogger {
    level: LevelFilter,
    output: Option<MultiProgress>,
    time_origin: Instant,
}

impl ProgressLogger {
    /// Create a logger passing records up to `level`
    ///
    /// With `output` set, lines are printed through the progress display.
    pub fn new(level: LevelFilter, output: Option<MultiProgress>) -> Self {
        Self {
            level,
            output,
            time_origin: Instant::now(),
        }
    }

    /// Register this logger as the global `log` backend
    ///
    /// # Errors
    ///
    /// Returns an error if a global logger was already installed
    pub fn install(self) -> Result<()> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| AlgorithmError::InvalidParameter {
            parameter: "logger",
            value: level.to_string(),
            reason: e.to_string(),
        })?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    // Reporting goes to the terminal by design of a CLI logger
    #[allow(clippy::print_stderr)]
    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(record.level(), self.time_origin.elapsed(), record.args());
        let printed = self
            .output
            .as_ref()
            .is_some_and(|multi_progress| multi_progress.println(&line).is_ok());
        if !printed {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {}
}

/// Render one log line as `[  1.23s] WARN message`
pub fn format_line(level: Level, elapsed: Duration, message: &fmt::Arguments<'_>) -> String {
    format!("[{:>7.2}s] {level:<5} {message}", elapsed.as_secs_f64())
}

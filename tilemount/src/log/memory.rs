//! Logger that records messages for later inspection.

use crate::log::{LogLevel, Logger};
use parking_lot::Mutex;
use std::fmt::Arguments;

/// Keeps every message in memory.
///
/// ```
/// use tilemount::log::{LogLevel, Logger, MemoryLogger};
/// use tilemount::log_warn;
///
/// let logger = MemoryLogger::new();
/// log_warn!(logger, "row {} out of range", 9);
/// assert!(logger.contains(LogLevel::Warn, "out of range"));
/// ```
#[derive(Debug)]
pub struct MemoryLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
    min_level: LogLevel,
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Trace)
    }

    /// Records only messages at `min_level` or above.
    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            min_level,
        }
    }

    /// Copy of everything logged so far.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().clone()
    }

    /// True if a message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        if self.enabled(level) {
            self.records.lock().push((level, args.to_string()));
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

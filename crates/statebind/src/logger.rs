//! Debug sinks for serialization tracing
//!
//! The decoder and encoder report what they do through a [`DebugLogger`].
//! Tracing never changes the outcome of a call.

use log::Level;
use std::sync::{Mutex, PoisonError};

/// Receives leveled trace messages from the engine
pub trait DebugLogger: Send + Sync {
    /// Record a message at the given level
    fn log(&self, level: Level, message: &str);

    /// Record a debug message
    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Record an info message
    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Record a warning
    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }
}

/// Forwards to the `log` crate under the `statebind` target
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl DebugLogger for LogLogger {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "statebind", level, "{message}");
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl DebugLogger for NullLogger {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    /// Create an empty logger
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages, oldest first
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded messages without levels
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, msg)| msg).collect()
    }
}

impl DebugLogger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

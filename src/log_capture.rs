//! A message sink that captures parser output in memory.
//!
//! Used by the test-suite to assert on warnings, and by embedders that want to show the
//! messages of a parse somewhere other than the terminal.

use crate::messages::{MessageLevel, MessageSink};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

const MAX_LOG_ENTRIES: usize = 1000;

/// Represents a single captured message.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: MessageLevel,
    pub message: String,
}

/// A thread-safe, fixed-capacity message buffer.
#[derive(Clone, Debug)]
pub struct LogBuffer(Arc<Mutex<VecDeque<LogEntry>>>);

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(VecDeque::with_capacity(
            MAX_LOG_ENTRIES,
        ))))
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        // A poisoned buffer still holds valid entries.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn read(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.lock()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, level: MessageLevel, message: &str) {
        let mut buffer = self.lock();

        if buffer.len() >= MAX_LOG_ENTRIES {
            buffer.pop_front();
        }

        buffer.push_back(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.to_string(),
        });
    }

    /// Messages recorded at `level`, oldest first.
    pub fn messages(&self, level: MessageLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }
}

/// Sink that records every message into a `LogBuffer`.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    buffer: LogBuffer,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the internal buffer.
    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn warnings(&self) -> Vec<String> {
        self.buffer.messages(MessageLevel::Warn)
    }

    pub fn infos(&self) -> Vec<String> {
        self.buffer.messages(MessageLevel::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.buffer.messages(MessageLevel::Error)
    }
}

impl MessageSink for CaptureSink {
    fn info(&self, msg: &str) {
        self.buffer.push(MessageLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.buffer.push(MessageLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.buffer.push(MessageLevel::Error, msg);
    }
}

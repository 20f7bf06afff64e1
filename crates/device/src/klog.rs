//! Kernel log sink.
//!
//! The device code logs through the `log` facade the way module code calls
//! `pr_info!`. [`KernelLog`] collects those records into a bounded ring, the
//! equivalent of the `dmesg` buffer, and can mirror them to stderr.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Lines kept before the oldest are dropped
pub const DEFAULT_CAPACITY: usize = 512;

pub struct KernelLog {
    max_level: LevelFilter,
    echo: bool,
    capacity: usize,
    ring: Mutex<VecDeque<String>>,
}

impl KernelLog {
    pub fn new(max_level: LevelFilter, capacity: usize) -> Self {
        Self {
            max_level,
            echo: false,
            capacity: capacity.max(1),
            ring: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Mirror every accepted record to stderr as well
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Install as the global logger. Call once during start-up.
    pub fn install(self) -> Result<&'static KernelLog, SetLoggerError> {
        let max_level = self.max_level;
        let logger: &'static KernelLog = Box::leak(Box::new(self));
        log::set_logger(logger)?;
        log::set_max_level(max_level);
        Ok(logger)
    }

    /// Buffered lines, oldest first
    pub fn dmesg(&self) -> Vec<String> {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Log for KernelLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message"
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        if self.echo {
            eprintln!("{}", line);
        }

        let mut ring = self.ring.lock().unwrap_or_else(PoisonError::into_inner);
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(line);
    }

    fn flush(&self) {}
}

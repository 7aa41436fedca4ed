use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::result::CheckResult;

/// One run of a check against one RDP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub pid: String,
    pub result: CheckResult,
}

/// Append-only run history of a check.
///
/// Entries keep insertion order; a per-pid index makes the latest entry for
/// an identifier an O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct Log {
    entries: Vec<LogEntry>,
    by_pid: HashMap<String, Vec<usize>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.by_pid
            .entry(entry.pid.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries for `pid`, oldest first.
    pub fn by_pid(&self, pid: &str) -> Vec<&LogEntry> {
        self.by_pid
            .get(pid)
            .map(|positions| positions.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }

    pub fn last_for(&self, pid: &str) -> Option<&LogEntry> {
        let idx = *self.by_pid.get(pid)?.last()?;
        self.entries.get(idx)
    }
}

//! User-facing build log.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
    pub time: DateTime<Local>,
}

impl LogEntry {
    /// `HH:MM:SS` stamp for display.
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}

/// Ordered log that collapses consecutive duplicates.
#[derive(Debug, Clone, Default)]
pub struct BuildLog {
    entries: Vec<LogEntry>,
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless it repeats the last `(kind, text)` pair.
    /// Returns whether anything was stored.
    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) -> bool {
        let text = text.into();
        if let Some(last) = self.entries.last() {
            if last.kind == kind && last.text == text {
                return false;
            }
        }
        self.entries.push(LogEntry {
            kind,
            text,
            time: Local::now(),
        });
        true
    }

    pub fn info(&mut self, text: impl Into<String>) -> bool {
        self.push(LogKind::Info, text)
    }

    pub fn success(&mut self, text: impl Into<String>) -> bool {
        self.push(LogKind::Success, text)
    }

    pub fn error(&mut self, text: impl Into<String>) -> bool {
        self.push(LogKind::Error, text)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.kind == LogKind::Error)
    }

    pub fn clear_errors(&mut self) {
        self.entries.retain(|e| e.kind != LogKind::Error);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let mut log = BuildLog::new();
        assert!(log.info("Connecting..."));
        assert!(!log.info("Connecting..."));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_same_text_different_kind_kept() {
        let mut log = BuildLog::new();
        log.info("done");
        log.success("done");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_non_consecutive_duplicates_kept() {
        let mut log = BuildLog::new();
        log.info("a");
        log.info("b");
        log.info("a");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_clear_errors() {
        let mut log = BuildLog::new();
        log.info("a");
        log.error("boom");
        assert!(log.has_errors());

        log.clear_errors();
        assert!(!log.has_errors());
        assert_eq!(log.len(), 1);
    }
}

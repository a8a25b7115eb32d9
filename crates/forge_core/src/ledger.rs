//! Cursor-addressed history of generated artifacts.
//!
//! Appending while the cursor is behind the tail discards the redo branch
//! first ("branch on write"), so nothing ever dangles past the cursor
//! after an append.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One generated document and the instruction that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub code: String,
    pub prompt: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    pub fn new(code: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }

    /// Creation time as milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

/// Ordered artifacts plus a cursor.
///
/// Invariant: `cursor` is `None` iff `entries` is empty, otherwise it
/// indexes a valid entry.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<Artifact>,
    cursor: Option<usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact at the cursor, dropping any redo branch.
    pub fn append(&mut self, artifact: Artifact) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(artifact);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Reposition the cursor without touching contents.
    pub fn move_to(&mut self, index: usize) -> CoreResult<&Artifact> {
        if index >= self.entries.len() {
            return Err(CoreError::OutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        self.cursor = Some(index);
        Ok(&self.entries[index])
    }

    /// Step back one version. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    /// Step forward one version. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Artifact> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    pub fn entries(&self) -> &[Artifact] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// `v<position>/<total>`, e.g. `v2/3`; `v0/0` when empty.
    pub fn version_label(&self) -> String {
        let position = self.cursor.map(|c| c + 1).unwrap_or(0);
        format!("v{}/{}", position, self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(name: &str) -> Artifact {
        Artifact::new(format!("<html>{}</html>", name), name)
    }

    fn prompts(ledger: &Ledger) -> Vec<&str> {
        ledger.entries().iter().map(|a| a.prompt.as_str()).collect()
    }

    fn assert_invariant(ledger: &Ledger) {
        match ledger.cursor() {
            None => assert!(ledger.is_empty()),
            Some(c) => assert!(c < ledger.len()),
        }
    }

    #[test]
    fn test_empty() {
        let ledger = Ledger::new();
        assert!(ledger.current().is_none());
        assert_eq!(ledger.cursor(), None);
        assert_eq!(ledger.version_label(), "v0/0");
    }

    #[test]
    fn test_append_moves_cursor_to_tail() {
        let mut ledger = Ledger::new();
        ledger.append(art("A"));
        ledger.append(art("B"));

        assert_eq!(ledger.cursor(), Some(1));
        assert_eq!(ledger.current().unwrap().prompt, "B");
        assert_eq!(ledger.version_label(), "v2/2");
    }

    #[test]
    fn test_append_discards_redo_branch() {
        let mut ledger = Ledger::new();
        ledger.append(art("A"));
        ledger.append(art("B"));
        ledger.append(art("C"));
        ledger.move_to(0).unwrap();

        ledger.append(art("D"));

        assert_eq!(prompts(&ledger), vec!["A", "D"]);
        assert_eq!(ledger.cursor(), Some(1));
        assert!(!ledger.can_redo());
    }

    #[test]
    fn test_move_to_out_of_bounds() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.move_to(0),
            Err(CoreError::OutOfBounds { index: 0, len: 0 })
        ));

        ledger.append(art("A"));
        assert!(ledger.move_to(1).is_err());
        assert_eq!(ledger.cursor(), Some(0));
    }

    #[test]
    fn test_undo_redo_boundaries() {
        let mut ledger = Ledger::new();
        assert!(!ledger.undo());
        assert!(!ledger.redo());

        ledger.append(art("A"));
        ledger.append(art("B"));

        assert!(!ledger.redo());
        assert_eq!(ledger.cursor(), Some(1));

        assert!(ledger.undo());
        assert!(!ledger.undo());
        assert_eq!(ledger.cursor(), Some(0));

        assert!(ledger.redo());
        assert_eq!(ledger.current().unwrap().prompt, "B");
    }

    #[test]
    fn test_invariant_over_mixed_operations() {
        let mut ledger = Ledger::new();
        let script: &[(&str, usize)] = &[
            ("append", 0),
            ("append", 0),
            ("move", 0),
            ("append", 0),
            ("append", 0),
            ("move", 5),
            ("undo", 0),
            ("undo", 0),
            ("undo", 0),
            ("append", 0),
            ("redo", 0),
            ("move", 1),
            ("redo", 0),
        ];

        for (i, (op, arg)) in script.iter().enumerate() {
            match *op {
                "append" => ledger.append(art(&i.to_string())),
                "move" => {
                    let _ = ledger.move_to(*arg);
                }
                "undo" => {
                    ledger.undo();
                }
                "redo" => {
                    ledger.redo();
                }
                _ => unreachable!(),
            }
            assert_invariant(&ledger);
            if *op == "append" {
                assert_eq!(ledger.cursor(), Some(ledger.len() - 1));
            }
        }
    }

    #[test]
    fn test_current_tracks_cursor_after_failed_move() {
        let mut ledger = Ledger::new();
        assert!(ledger.move_to(3).is_err());
        assert!(ledger.current().is_none());

        ledger.append(art("A"));
        ledger.append(art("B"));
        assert!(ledger.move_to(2).is_err());
        assert_eq!(ledger.cursor(), Some(1));
        assert_eq!(ledger.current().unwrap().prompt, "B");
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        ledger.append(art("A"));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.current().is_none());
    }
}

//! Export helpers: download-style file export and clipboard copy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ClipboardError;
use crate::ledger::Artifact;

/// MIME type of exported documents.
pub const EXPORT_MIME: &str = "text/html";

/// File name for an export stamped with `millis` since the Unix epoch.
pub fn export_file_name(millis: i64) -> String {
    format!("forge-app-{}.html", millis)
}

/// Write the artifact's document into `dir`, returning the file path.
///
/// Named after the export time. An existing file is never overwritten;
/// a numeric suffix is added instead.
pub fn export_html(artifact: &Artifact, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let millis = Utc::now().timestamp_millis();
    let mut path = dir.join(export_file_name(millis));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("forge-app-{}-{}.html", millis, suffix));
        suffix += 1;
    }

    fs::write(&path, &artifact.code)?;
    Ok(path)
}

/// A clipboard the host may or may not have.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-memory clipboard, for hosts without a system clipboard and for tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// Make every copy fail
    pub broken: bool,
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.broken {
            return Err(ClipboardError::Unavailable("no clipboard attached".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Copy text, refusing empty content.
pub fn copy_text(sink: &mut dyn ClipboardSink, text: &str) -> Result<(), ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }
    sink.set_text(text)
}

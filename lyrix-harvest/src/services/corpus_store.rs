//! Append-only corpus file
//!
//! Each accepted song becomes one framed record:
//!
//! ```text
//! <|startoftext|>
//! <lyrics body>
//! <|endoftext|>
//! ```
//!
//! Records are written in a single call and synced before `append` returns,
//! so files from separate runs can be concatenated as-is.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::CorpusRecord;

pub const START_MARKER: &str = "<|startoftext|>";
pub const END_MARKER: &str = "<|endoftext|>";

/// Corpus file sink
#[derive(Debug, Clone)]
pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty corpus file if none exists
    pub fn ensure_exists(&self) -> io::Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        tracing::info!(path = %self.path.display(), "Created lyrics corpus");
        Ok(())
    }

    /// True when the corpus file exists and holds at least one byte
    pub fn has_content(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Append one framed record and sync it to disk
    pub fn append(&self, record: &CorpusRecord) -> io::Result<()> {
        let framed = frame_record(&record.body);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(framed.as_bytes())?;
        file.flush()?;
        file.sync_data()?;

        tracing::debug!(title = %record.title, bytes = framed.len(), "Appended corpus record");
        Ok(())
    }
}

fn frame_record(body: &str) -> String {
    format!("{}\n{}\n{}\n", START_MARKER, body, END_MARKER)
}

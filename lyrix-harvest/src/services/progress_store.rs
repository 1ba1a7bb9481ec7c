//! Persisted seen-set
//!
//! The progress file is a sorted JSON array of song ids. Loading never fails:
//! a missing file is the normal first run, and an unreadable or malformed
//! file is logged and treated as empty. Saving goes through temp file plus
//! rename, so a crash mid-write leaves the previous snapshot intact.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{SeenSet, SongId};
use crate::services::corpus_store::CorpusStore;

/// Progress snapshot file
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    corpus: CorpusStore,
}

impl ProgressStore {
    /// `corpus` is consulted by the consistency guard in [`load`](Self::load)
    pub fn new(path: impl Into<PathBuf>, corpus: CorpusStore) -> Self {
        Self {
            path: path.into(),
            corpus,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the seen-set
    ///
    /// A non-empty set is discarded when the corpus file is missing or
    /// empty, since progress must never claim records that do not exist.
    pub fn load(&self) -> SeenSet {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Starting fresh (no existing progress file)");
                return SeenSet::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read progress file");
                return SeenSet::new();
            }
        };

        let ids = match parse_progress(&content) {
            Ok(ids) => ids,
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "Could not parse progress file");
                return SeenSet::new();
            }
        };

        if !ids.is_empty() && !self.corpus.has_content() {
            warn!(
                discarded = ids.len(),
                corpus = %self.corpus.path().display(),
                "Progress file found but lyrics corpus is empty. Resetting saved list."
            );
            return SeenSet::new();
        }

        info!("Loaded {} saved song IDs", ids.len());
        ids
    }

    /// Write the full snapshot, sorted
    pub fn save(&self, ids: &SeenSet) -> lyrix_common::Result<()> {
        let json = serde_json::to_vec(ids)?;
        lyrix_common::file_utils::write_atomic(&self.path, &json)?;
        info!("Progress saved: {} songs", ids.len());
        Ok(())
    }
}

/// Parse a progress snapshot, discarding entries that are not ids
fn parse_progress(content: &str) -> Result<SeenSet, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let Value::Array(entries) = value else {
        return Err("expected a JSON array".to_string());
    };

    Ok(entries.iter().filter_map(coerce_id).collect())
}

fn coerce_id(entry: &Value) -> Option<SongId> {
    match entry {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f.trunc() as SongId)
        }),
        Value::String(s) => s.trim().parse::<SongId>().ok(),
        // Integer coercion treats booleans as 0 and 1
        Value::Bool(b) => Some(SongId::from(*b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stores(dir: &TempDir) -> (ProgressStore, CorpusStore) {
        let corpus = CorpusStore::new(dir.path().join("lyrics.txt"));
        let progress = ProgressStore::new(dir.path().join("progress.json"), corpus.clone());
        (progress, corpus)
    }

    fn seed_corpus(corpus: &CorpusStore) {
        std::fs::write(corpus.path(), "<|startoftext|>\nx\n<|endoftext|>\n").unwrap();
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let (progress, _) = stores(&dir);
        assert!(progress.load().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let (progress, corpus) = stores(&dir);
        seed_corpus(&corpus);

        std::fs::write(progress.path(), "{not json").unwrap();
        assert!(progress.load().is_empty());

        std::fs::write(progress.path(), r#"{"ids": [1, 2]}"#).unwrap();
        assert!(progress.load().is_empty());
    }

    #[test]
    fn test_load_coerces_entries() {
        let dir = TempDir::new().unwrap();
        let (progress, corpus) = stores(&dir);
        seed_corpus(&corpus);

        std::fs::write(
            progress.path(),
            r#"[3, "7", " 11 ", 12.0, "abc", null, -4, [5], {"id": 9}]"#,
        )
        .unwrap();

        let ids = progress.load();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![3, 7, 11, 12]);
    }

    #[test]
    fn test_load_coerces_booleans_to_integers() {
        let dir = TempDir::new().unwrap();
        let (progress, corpus) = stores(&dir);
        seed_corpus(&corpus);

        std::fs::write(progress.path(), "[true, false, 8]").unwrap();

        let ids = progress.load();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![0, 1, 8]);
    }

    #[test]
    fn test_guard_resets_when_corpus_missing() {
        let dir = TempDir::new().unwrap();
        let (progress, _) = stores(&dir);

        std::fs::write(progress.path(), "[1, 2, 3]").unwrap();
        assert!(progress.load().is_empty());
    }

    #[test]
    fn test_guard_resets_when_corpus_empty() {
        let dir = TempDir::new().unwrap();
        let (progress, corpus) = stores(&dir);
        corpus.ensure_exists().unwrap();

        std::fs::write(progress.path(), "[1, 2, 3]").unwrap();
        assert!(progress.load().is_empty());
    }

    #[test]
    fn test_save_writes_sorted_array() {
        let dir = TempDir::new().unwrap();
        let (progress, corpus) = stores(&dir);
        seed_corpus(&corpus);

        let ids: SeenSet = [42, 7, 19].into_iter().collect();
        progress.save(&ids).unwrap();

        let content = std::fs::read_to_string(progress.path()).unwrap();
        assert_eq!(content, "[7,19,42]");
        assert_eq!(progress.load(), ids);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let corpus = CorpusStore::new(dir.path().join("lyrics.txt"));
        // Target is an existing directory, rename over it fails
        let progress = ProgressStore::new(dir.path(), corpus);

        assert!(progress.save(&SeenSet::new()).is_err());
    }
}

//! Catalog items and corpus records

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Catalog song id, the deduplication key
pub type SongId = u64;

/// Ids already durably written to the corpus
///
/// Ordered so a persisted snapshot is deterministic.
pub type SeenSet = BTreeSet<SongId>;

/// One catalog entry before its lyrics are fetched
///
/// Deserializes straight from a catalog song listing; unknown fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReference {
    /// Catalog song id
    pub id: SongId,
    /// Song title (log output only)
    pub title: String,
}

impl ItemReference {
    pub fn new(id: SongId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Accepted, cleaned lyrics ready to append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    pub title: String,
    pub body: String,
}

impl CorpusRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

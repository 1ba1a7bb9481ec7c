//! Catalog collaborator seam
//!
//! The ingestion pipeline talks to the lyrics catalog only through
//! [`LyricsCatalog`]. `GeniusClient` is the production implementation; tests
//! plug in scripted stubs.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{ItemReference, SongId};

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Client could not be constructed (bad credential format, TLS setup)
    #[error("Client configuration error: {0}")]
    Configuration(String),
}

/// Artist resolved by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistRef {
    pub id: u64,
    pub name: String,
}

/// One page of an artist's song listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongPage {
    pub songs: Vec<ItemReference>,
    /// Next page number, `None` on the last page
    pub next_page: Option<u32>,
}

/// Song listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SongSort {
    /// Descending by catalog popularity score
    #[default]
    Popularity,
    Title,
}

impl SongSort {
    pub fn as_str(self) -> &'static str {
        match self {
            SongSort::Popularity => "popularity",
            SongSort::Title => "title",
        }
    }
}

impl std::str::FromStr for SongSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" => Ok(SongSort::Popularity),
            "title" => Ok(SongSort::Title),
            other => Err(format!(
                "unknown sort order '{}' (expected popularity or title)",
                other
            )),
        }
    }
}

/// External lyrics catalog
#[async_trait::async_trait]
pub trait LyricsCatalog: Send + Sync {
    /// Resolve an artist name to its catalog id
    async fn find_artist_id(&self, name: &str) -> Result<ArtistRef, CatalogError>;

    /// Fetch one page of the artist's songs
    ///
    /// Pages are 1-based.
    async fn list_songs_page(
        &self,
        artist_id: u64,
        sort: SongSort,
        per_page: u32,
        page: u32,
    ) -> Result<SongPage, CatalogError>;

    /// Fetch full lyric text for a song
    ///
    /// `Ok(None)` means the catalog has the song but no lyrics for it.
    async fn fetch_lyrics(&self, song_id: SongId) -> Result<Option<String>, CatalogError>;
}

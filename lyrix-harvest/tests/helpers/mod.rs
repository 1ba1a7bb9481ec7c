//! Test Helper Utilities
//!
//! Shared utilities for testing lyrix-harvest: a scripted catalog, run
//! configuration pointing at a scratch directory, and file inspection.

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::LogCapture;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use lyrix_harvest::config::HarvestConfig;
use lyrix_harvest::models::{ItemReference, SongId};
use lyrix_harvest::services::corpus_store::START_MARKER;
use lyrix_harvest::services::{ArtistRef, CatalogError, LyricsCatalog, SongPage, SongSort};

pub const ARTIST_ID: u64 = 1688136;

/// Scripted lyrics response for one song
#[derive(Debug, Clone)]
pub enum StubLyrics {
    Text(String),
    /// Catalog has no lyrics for the song
    Missing,
    /// Fetch fails with a network error
    Error,
    /// Fetch never completes
    Hang,
}

/// Side effect run while serving a given lyrics fetch
pub type FetchHook = Box<dyn Fn() + Send + Sync>;

/// In-memory catalog with scripted pages and lyrics
pub struct StubCatalog {
    artist: Option<ArtistRef>,
    pages: Vec<Vec<ItemReference>>,
    lyrics: HashMap<SongId, StubLyrics>,
    failing_page: Option<u32>,
    cancel_after: Option<(usize, CancellationToken)>,
    fetch_hook: Option<(usize, FetchHook)>,
    fetches: Mutex<Vec<SongId>>,
    page_requests: Mutex<Vec<u32>>,
    sorts: Mutex<Vec<SongSort>>,
}

impl StubCatalog {
    /// Pages of the given sizes; ids are numbered from 1 in catalog order
    /// and every song has acceptable lyrics
    pub fn with_pages(page_sizes: &[usize]) -> Self {
        let mut next_id: SongId = 1;
        let mut lyrics = HashMap::new();
        let pages = page_sizes
            .iter()
            .map(|&size| {
                (0..size)
                    .map(|_| {
                        let id = next_id;
                        next_id += 1;
                        lyrics.insert(id, StubLyrics::Text(long_lyrics(id)));
                        ItemReference::new(id, format!("Song {}", id))
                    })
                    .collect()
            })
            .collect();

        Self {
            artist: Some(ArtistRef {
                id: ARTIST_ID,
                name: "Yeat".to_string(),
            }),
            pages,
            lyrics,
            failing_page: None,
            cancel_after: None,
            fetch_hook: None,
            fetches: Mutex::new(Vec::new()),
            page_requests: Mutex::new(Vec::new()),
            sorts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_lyrics(mut self, id: SongId, lyrics: StubLyrics) -> Self {
        self.lyrics.insert(id, lyrics);
        self
    }

    /// Listing `page` fails with a server error
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Cancel `token` while serving the `n`th lyrics fetch
    pub fn cancel_after_fetches(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    /// Run `hook` while serving the `n`th lyrics fetch
    pub fn on_fetch(mut self, n: usize, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.fetch_hook = Some((n, Box::new(hook)));
        self
    }

    pub fn without_artist(mut self) -> Self {
        self.artist = None;
        self
    }

    pub fn fetched_ids(&self) -> Vec<SongId> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.page_requests.lock().unwrap().clone()
    }

    /// Sort order sent with each page request
    pub fn requested_sorts(&self) -> Vec<SongSort> {
        self.sorts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LyricsCatalog for StubCatalog {
    async fn find_artist_id(&self, name: &str) -> Result<ArtistRef, CatalogError> {
        self.artist
            .clone()
            .ok_or_else(|| CatalogError::NotFound(format!("artist {}", name)))
    }

    async fn list_songs_page(
        &self,
        _artist_id: u64,
        sort: SongSort,
        _per_page: u32,
        page: u32,
    ) -> Result<SongPage, CatalogError> {
        self.page_requests.lock().unwrap().push(page);
        self.sorts.lock().unwrap().push(sort);

        if self.failing_page == Some(page) {
            return Err(CatalogError::ApiError(503, "Service Unavailable".to_string()));
        }

        let index = page as usize - 1;
        let songs = self.pages.get(index).cloned().unwrap_or_default();
        let next_page = if index + 1 < self.pages.len() {
            Some(page + 1)
        } else {
            None
        };

        Ok(SongPage { songs, next_page })
    }

    async fn fetch_lyrics(&self, song_id: SongId) -> Result<Option<String>, CatalogError> {
        let count = {
            let mut fetches = self.fetches.lock().unwrap();
            fetches.push(song_id);
            fetches.len()
        };

        if let Some((n, token)) = &self.cancel_after {
            if count == *n {
                token.cancel();
            }
        }

        if let Some((n, hook)) = &self.fetch_hook {
            if count == *n {
                hook();
            }
        }

        match self.lyrics.get(&song_id) {
            Some(StubLyrics::Text(text)) => Ok(Some(text.clone())),
            Some(StubLyrics::Missing) | None => Ok(None),
            Some(StubLyrics::Error) => Err(CatalogError::NetworkError(
                "operation timed out".to_string(),
            )),
            Some(StubLyrics::Hang) => std::future::pending().await,
        }
    }
}

/// Lyrics comfortably over the minimum length, with an embed artifact
pub fn long_lyrics(id: SongId) -> String {
    format!(
        "Lyrics for song {}\nI just pulled up in the Bentley truck, twizzy\n{}Embed",
        id, id
    )
}

/// Run configuration rooted in `dir`, with no inter-item delay
pub fn test_config(dir: &Path, target_total: usize) -> HarvestConfig {
    HarvestConfig {
        corpus_path: dir.join("lyrics.txt"),
        progress_path: dir.join("progress.json"),
        target_total,
        item_delay: Duration::ZERO,
        ..HarvestConfig::default()
    }
}

/// Ids in the progress file, as written
pub fn read_progress(path: &Path) -> Vec<SongId> {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Number of framed records in the corpus file
pub fn corpus_record_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|content| content.matches(START_MARKER).count())
        .unwrap_or(0)
}

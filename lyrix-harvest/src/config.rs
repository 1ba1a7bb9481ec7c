//! Configuration resolution for lyrix-harvest
//!
//! **Priority:** CLI argument / environment variable → TOML → built-in default
//!
//! Everything a run needs is collected into [`HarvestConfig`] and handed to
//! the controller at construction; nothing is read from process-wide state
//! after that point.

use lyrix_common::config::TomlConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::error::{HarvestError, HarvestResult};
use crate::services::genius_client::GeniusOptions;
use crate::services::quality_filter::MIN_LYRICS_LENGTH;
use crate::services::SongSort;

/// Environment variable holding the Genius bearer credential
pub const ACCESS_TOKEN_ENV: &str = "GENIUS_ACCESS_TOKEN";

pub const DEFAULT_ARTIST: &str = "Yeat";
pub const DEFAULT_CORPUS_PATH: &str = "yeat_lyrics.txt";
pub const DEFAULT_PROGRESS_PATH: &str = "scrape_progress.json";
pub const DEFAULT_MAX_SONGS: usize = 400;
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const DEFAULT_ITEM_DELAY_MS: u64 = 200;
pub const DEFAULT_CHECKPOINT_EVERY: usize = 5;

/// Largest page size the Genius songs endpoint honours
pub const MAX_PER_PAGE: u32 = 50;

/// Values supplied on the command line or through `LYRIX_*` variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub artist: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub progress_path: Option<PathBuf>,
    pub max_songs: Option<usize>,
    pub per_page: Option<u32>,
    pub sort: Option<SongSort>,
    /// Smoke-test cap that replaces `max_songs` as the target
    pub limit: Option<usize>,
    pub item_delay_ms: Option<u64>,
}

/// Fully resolved settings for one harvest run
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub artist: String,
    pub corpus_path: PathBuf,
    pub progress_path: PathBuf,
    /// Catalog items to walk before stopping
    pub target_total: usize,
    pub per_page: u32,
    pub sort: SongSort,
    /// Fixed pause after every processed item
    pub item_delay: Duration,
    /// Checkpoint whenever the recorded total is a multiple of this
    pub checkpoint_every: usize,
    pub min_lyrics_length: usize,
    pub genius: GeniusOptions,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            artist: DEFAULT_ARTIST.to_string(),
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            progress_path: PathBuf::from(DEFAULT_PROGRESS_PATH),
            target_total: DEFAULT_MAX_SONGS,
            per_page: DEFAULT_PER_PAGE,
            sort: SongSort::Popularity,
            item_delay: Duration::from_millis(DEFAULT_ITEM_DELAY_MS),
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            min_lyrics_length: MIN_LYRICS_LENGTH,
            genius: GeniusOptions::default(),
        }
    }
}

impl HarvestConfig {
    /// Merge overrides over TOML over defaults, then validate
    pub fn resolve(overrides: ConfigOverrides, toml: &TomlConfig) -> HarvestResult<Self> {
        let defaults = Self::default();

        let max_songs = overrides
            .max_songs
            .or(toml.max_songs)
            .unwrap_or(DEFAULT_MAX_SONGS);

        let sort = match overrides.sort {
            Some(sort) => sort,
            None => match toml.sort.as_deref() {
                Some(name) => name.parse().map_err(HarvestError::Configuration)?,
                None => defaults.sort,
            },
        };

        let config = Self {
            artist: overrides
                .artist
                .or_else(|| toml.artist.clone())
                .unwrap_or(defaults.artist),
            corpus_path: overrides
                .corpus_path
                .or_else(|| toml.corpus_path.clone())
                .unwrap_or(defaults.corpus_path),
            progress_path: overrides
                .progress_path
                .or_else(|| toml.progress_path.clone())
                .unwrap_or(defaults.progress_path),
            target_total: overrides.limit.unwrap_or(max_songs),
            per_page: overrides
                .per_page
                .or(toml.per_page)
                .unwrap_or(DEFAULT_PER_PAGE),
            sort,
            item_delay: Duration::from_millis(
                overrides
                    .item_delay_ms
                    .or(toml.item_delay_ms)
                    .unwrap_or(DEFAULT_ITEM_DELAY_MS),
            ),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HarvestResult<()> {
        if self.artist.trim().is_empty() {
            return Err(HarvestError::Configuration(
                "artist name must not be empty".to_string(),
            ));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(HarvestError::Configuration(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        if self.checkpoint_every == 0 {
            return Err(HarvestError::Configuration(
                "checkpoint interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read the Genius bearer credential from the environment
///
/// Absent or blank is a fatal configuration error.
pub fn resolve_access_token() -> HarvestResult<String> {
    match std::env::var(ACCESS_TOKEN_ENV) {
        Ok(token) if is_valid_key(&token) => {
            info!("Genius access token loaded from environment");
            Ok(token.trim().to_string())
        }
        _ => Err(HarvestError::Configuration(format!(
            "{} not found in environment. Set it in the shell or in a .env file:\n\
             {}=your-token-here\n\
             \n\
             Obtain a client access token at: https://genius.com/api-clients",
            ACCESS_TOKEN_ENV, ACCESS_TOKEN_ENV
        ))),
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

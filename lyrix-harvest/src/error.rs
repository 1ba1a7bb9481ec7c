//! Error types for lyrix-harvest
//!
//! Severity follows the run state machine: `Configuration` aborts before any
//! ingestion, `Catalog` and `Storage` raised outside the per-item branch end
//! the run as FAILED. Per-item fetch failures never surface here; they are
//! counted and logged by the controller.

use thiserror::Error;

use crate::services::CatalogError;

/// Harvest error type
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Missing credential or unusable client setup (fatal, not retried)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog call outside the per-item fetch failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Corpus or progress file I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// lyrix-common error
    #[error(transparent)]
    Common(#[from] lyrix_common::Error),
}

/// Result type for harvest operations
pub type HarvestResult<T> = Result<T, HarvestError>;

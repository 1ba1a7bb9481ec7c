//! Harvest services
//!
//! Leaf-first: stores and filter, the pagination walker, the catalog client,
//! and the controller that wires them into a resumable run.

pub mod catalog;
pub mod corpus_store;
pub mod genius_client;
pub mod ingestion_controller;
pub mod pagination_walker;
pub mod progress_store;
pub mod quality_filter;

pub use catalog::{ArtistRef, CatalogError, LyricsCatalog, SongPage, SongSort};
pub use corpus_store::CorpusStore;
pub use genius_client::{GeniusClient, GeniusOptions};
pub use ingestion_controller::{IngestionController, ItemOutcome, RunStatistics};
pub use pagination_walker::PaginationWalker;
pub use progress_store::ProgressStore;
pub use quality_filter::{QualityFilter, RejectReason};

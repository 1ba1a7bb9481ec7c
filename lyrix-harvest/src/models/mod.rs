//! Data models for lyrix-harvest
//!
//! - Catalog item references and corpus records
//! - Run state machine and summary

pub mod item_reference;
pub mod run_state;

pub use item_reference::{CorpusRecord, ItemReference, SeenSet, SongId};
pub use run_state::{HarvestState, RunState, RunSummary};

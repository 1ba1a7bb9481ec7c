//! Per-run outcome counters
//!
//! Display: "N processed: S saved, K already saved, T too short, L no lyrics, F failed"

use serde::{Deserialize, Serialize};

use super::ItemOutcome;
use crate::services::quality_filter::RejectReason;

/// Counters for one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Items walked (every outcome below)
    pub processed: usize,
    /// Items appended to the corpus this run
    pub saved: usize,
    /// Items skipped because their id was already recorded
    pub already_saved: usize,
    /// Fetched text under the minimum length
    pub rejected_too_short: usize,
    /// Catalog had no lyrics for the item
    pub rejected_no_lyrics: usize,
    /// Fetch or corpus write failed
    pub failed: usize,
    /// Progress snapshots written successfully
    pub checkpoints: usize,
}

impl RunStatistics {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.processed += 1;
        match outcome {
            ItemOutcome::AlreadySaved => self.already_saved += 1,
            ItemOutcome::Saved => self.saved += 1,
            ItemOutcome::Rejected(RejectReason::TooShort) => self.rejected_too_short += 1,
            ItemOutcome::Rejected(RejectReason::NoLyrics) => self.rejected_no_lyrics += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} processed: {} saved, {} already saved, {} too short, {} no lyrics, {} failed",
            self.processed,
            self.saved,
            self.already_saved,
            self.rejected_too_short,
            self.rejected_no_lyrics,
            self.failed
        )
    }
}

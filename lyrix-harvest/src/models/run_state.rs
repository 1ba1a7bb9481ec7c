//! Harvest run state machine
//!
//! A run progresses INIT → RUNNING → (COMPLETED | INTERRUPTED | FAILED).
//! Nothing here is persisted: a resumed run restarts pagination at page 1
//! and relies on the seen-set to skip finished items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::ingestion_controller::RunStatistics;

/// Harvest run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HarvestState {
    /// Preparing stores and loading progress
    Init,
    /// Walking catalog pages
    Running,
    /// Target reached or catalog exhausted
    Completed,
    /// Cancelled by the operator
    Interrupted,
    /// Stopped by an unrecoverable error
    Failed,
}

impl HarvestState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            HarvestState::Completed | HarvestState::Interrupted | HarvestState::Failed
        )
    }
}

impl std::fmt::Display for HarvestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HarvestState::Init => "INIT",
            HarvestState::Running => "RUNNING",
            HarvestState::Completed => "COMPLETED",
            HarvestState::Interrupted => "INTERRUPTED",
            HarvestState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Process-lifetime cursor and counters for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Next catalog page to request, `None` once pagination is exhausted
    pub page_cursor: Option<u32>,
    /// Items walked so far (skipped, failed and saved alike)
    pub processed_count: usize,
    /// Items appended to the corpus during this run
    pub new_saves_count: usize,
    /// Items to walk before stopping
    pub target_total: usize,
}

impl RunState {
    pub fn new(target_total: usize) -> Self {
        Self {
            page_cursor: Some(1),
            processed_count: 0,
            new_saves_count: 0,
            target_total,
        }
    }

    pub fn target_reached(&self) -> bool {
        self.processed_count >= self.target_total
    }
}

/// Outcome of one run, produced regardless of terminal state
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub state: HarvestState,
    /// Items appended to the corpus during this run
    pub new_saves: usize,
    /// Ids recorded in the seen-set when the run ended
    pub total_recorded: usize,
    pub statistics: RunStatistics,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Failure description for FAILED runs
    pub error: Option<String>,
}

impl RunSummary {
    pub fn display_string(&self) -> String {
        format!(
            "Saved {} new song(s). Total in corpus: {}",
            self.new_saves, self.total_recorded
        )
    }
}

//! Harvest run orchestrator
//!
//! # State Progression
//! INIT → RUNNING → (COMPLETED | INTERRUPTED | FAILED)
//!
//! - **INIT**: create the corpus file if missing, load the seen-set
//! - **RUNNING**: resolve the artist, walk pages, fetch and gate each unseen
//!   item, append accepted lyrics, checkpoint every `checkpoint_every`
//!   recorded ids
//! - **COMPLETED**: target reached or catalog exhausted; final checkpoint if
//!   anything was saved since the last one
//! - **INTERRUPTED** / **FAILED**: progress is saved unconditionally before
//!   returning
//!
//! Items are handled strictly one at a time. Cancellation is observed while
//! waiting on the catalog and during the inter-item delay; an abandoned
//! fetch has not written anything yet.

mod statistics;

pub use statistics::RunStatistics;

use chrono::Utc;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{resolve_access_token, HarvestConfig};
use crate::error::{HarvestError, HarvestResult};
use crate::models::{CorpusRecord, HarvestState, ItemReference, RunState, RunSummary, SeenSet};
use crate::services::catalog::{CatalogError, LyricsCatalog};
use crate::services::corpus_store::CorpusStore;
use crate::services::genius_client::GeniusClient;
use crate::services::pagination_walker::PaginationWalker;
use crate::services::progress_store::ProgressStore;
use crate::services::quality_filter::{QualityFilter, RejectReason};

/// Result of handling one catalog item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Id already recorded, nothing fetched
    AlreadySaved,
    /// Appended to the corpus and recorded
    Saved,
    /// Fetched but not written
    Rejected(RejectReason),
    /// Fetch or corpus write failed; the run continues
    Failed(String),
}

/// How the RUNNING loop ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopEnd {
    Completed,
    Interrupted,
}

/// Mutable state owned by one run
struct RunContext {
    seen: SeenSet,
    run: RunState,
    stats: RunStatistics,
    /// New saves not yet covered by a checkpoint
    dirty: bool,
}

/// Ingestion controller
pub struct IngestionController<C: LyricsCatalog> {
    catalog: C,
    config: HarvestConfig,
    corpus: CorpusStore,
    progress: ProgressStore,
    filter: QualityFilter,
}

impl IngestionController<GeniusClient> {
    /// Build a controller backed by the Genius API
    ///
    /// Fails when the access token is missing or the client cannot be
    /// constructed. Neither is retried.
    pub fn from_config(config: HarvestConfig) -> HarvestResult<Self> {
        let token = resolve_access_token()?;
        let client = GeniusClient::new(token, config.genius.clone()).map_err(|e| {
            HarvestError::Configuration(format!("Unable to create Genius client: {}", e))
        })?;
        Ok(Self::new(client, config))
    }
}

impl<C: LyricsCatalog> IngestionController<C> {
    pub fn new(catalog: C, config: HarvestConfig) -> Self {
        let corpus = CorpusStore::new(config.corpus_path.clone());
        let progress = ProgressStore::new(config.progress_path.clone(), corpus.clone());
        let filter = QualityFilter::new(config.min_lyrics_length);

        Self {
            catalog,
            config,
            corpus,
            progress,
            filter,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Execute one harvest run
    ///
    /// Always returns a summary; the terminal state says how the run ended.
    pub async fn run(&self, cancel: &CancellationToken) -> RunSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            run_id = %run_id,
            artist = %self.config.artist,
            target = self.config.target_total,
            corpus = %self.corpus.path().display(),
            "Starting harvest run"
        );

        log_transition(run_id, HarvestState::Init);
        if let Err(e) = self.corpus.ensure_exists() {
            error!(run_id = %run_id, error = %e, "Unable to prepare lyrics corpus");
            log_transition(run_id, HarvestState::Failed);
            return RunSummary {
                run_id,
                state: HarvestState::Failed,
                new_saves: 0,
                total_recorded: 0,
                statistics: RunStatistics::default(),
                started_at,
                ended_at: Utc::now(),
                error: Some(HarvestError::Storage(e).to_string()),
            };
        }

        let mut ctx = RunContext {
            seen: self.progress.load(),
            run: RunState::new(self.config.target_total),
            stats: RunStatistics::default(),
            dirty: false,
        };
        let total_before = ctx.seen.len();

        log_transition(run_id, HarvestState::Running);
        let (state, failure) = match self.harvest(&mut ctx, cancel).await {
            Ok(LoopEnd::Completed) => (HarvestState::Completed, None),
            Ok(LoopEnd::Interrupted) => {
                info!(run_id = %run_id, "User interrupted. Saving progress...");
                (HarvestState::Interrupted, None)
            }
            Err(e) => {
                error!(run_id = %run_id, error = %e, "Harvest failed");
                (HarvestState::Failed, Some(e.to_string()))
            }
        };

        log_transition(run_id, state);

        if state != HarvestState::Completed || ctx.dirty {
            self.checkpoint(&mut ctx);
        }

        let summary = RunSummary {
            run_id,
            state,
            new_saves: ctx.run.new_saves_count,
            total_recorded: ctx.seen.len(),
            statistics: ctx.stats,
            started_at,
            ended_at: Utc::now(),
            error: failure,
        };

        info!(
            run_id = %run_id,
            state = %summary.state,
            total_before,
            "{}",
            summary.display_string()
        );

        summary
    }

    /// RUNNING loop
    ///
    /// Errors returned from here end the run as FAILED. Per-item fetch
    /// failures are absorbed into [`ItemOutcome::Failed`].
    async fn harvest(
        &self,
        ctx: &mut RunContext,
        cancel: &CancellationToken,
    ) -> HarvestResult<LoopEnd> {
        info!("Finding {}'s ID...", self.config.artist);
        let artist = match interruptible(cancel, self.catalog.find_artist_id(&self.config.artist)).await {
            Some(result) => result?,
            None => return Ok(LoopEnd::Interrupted),
        };

        info!(
            "Processing lyrics page-by-page (Target: {} songs) for {} (ID: {})",
            ctx.run.target_total, artist.name, artist.id
        );

        let mut walker = PaginationWalker::new(artist.id, self.config.sort, self.config.per_page);

        while !ctx.run.target_reached() {
            let batch = match interruptible(cancel, walker.next_batch(&self.catalog)).await {
                Some(result) => result?,
                None => return Ok(LoopEnd::Interrupted),
            };
            ctx.run.page_cursor = walker.cursor();

            let Some(items) = batch else {
                break;
            };

            for item in items {
                if ctx.run.target_reached() {
                    break;
                }
                ctx.run.processed_count += 1;

                let status = format!(
                    "[{:3}/{}] {}",
                    ctx.run.processed_count, ctx.run.target_total, item.title
                );

                let outcome = if ctx.seen.contains(&item.id) {
                    ItemOutcome::AlreadySaved
                } else {
                    match interruptible(cancel, self.catalog.fetch_lyrics(item.id)).await {
                        Some(fetched) => self.handle_fetched(&item, fetched, ctx),
                        None => return Ok(LoopEnd::Interrupted),
                    }
                };

                log_outcome(&status, &item, &outcome);
                ctx.stats.record(&outcome);

                if interruptible(cancel, tokio::time::sleep(self.config.item_delay))
                    .await
                    .is_none()
                {
                    return Ok(LoopEnd::Interrupted);
                }
            }

            if walker.is_exhausted() {
                break;
            }
        }

        Ok(LoopEnd::Completed)
    }

    /// Gate fetched lyrics and append them
    ///
    /// The id joins the seen-set only after the append succeeded.
    fn handle_fetched(
        &self,
        item: &ItemReference,
        fetched: Result<Option<String>, CatalogError>,
        ctx: &mut RunContext,
    ) -> ItemOutcome {
        let raw = match fetched {
            Ok(Some(raw)) => raw,
            Ok(None) => return ItemOutcome::Rejected(RejectReason::NoLyrics),
            Err(e) => return ItemOutcome::Failed(e.to_string()),
        };

        let body = match self.filter.evaluate(&raw) {
            Ok(body) => body,
            Err(reason) => return ItemOutcome::Rejected(reason),
        };

        if let Err(e) = self.corpus.append(&CorpusRecord::new(item.title.clone(), body)) {
            return ItemOutcome::Failed(format!("corpus write failed: {}", e));
        }

        ctx.seen.insert(item.id);
        ctx.run.new_saves_count += 1;
        ctx.dirty = true;

        if ctx.seen.len() % self.config.checkpoint_every == 0 {
            self.checkpoint(ctx);
        }

        ItemOutcome::Saved
    }

    /// Persist the seen-set; a failed write leaves the run dirty for the next one
    fn checkpoint(&self, ctx: &mut RunContext) {
        match self.progress.save(&ctx.seen) {
            Ok(()) => {
                ctx.dirty = false;
                ctx.stats.checkpoints += 1;
            }
            Err(e) => warn!(error = %e, "Failed to save progress"),
        }
    }
}

fn log_transition(run_id: Uuid, state: HarvestState) {
    debug!(run_id = %run_id, "Harvest entering {}", state);
}

fn log_outcome(status: &str, item: &ItemReference, outcome: &ItemOutcome) {
    match outcome {
        ItemOutcome::AlreadySaved => info!(song_id = item.id, "{} → SKIP (already saved)", status),
        ItemOutcome::Saved => info!(song_id = item.id, "{} → ✓ SAVED", status),
        ItemOutcome::Rejected(RejectReason::NoLyrics) => {
            info!(song_id = item.id, "{} → FAIL (no lyrics)", status)
        }
        ItemOutcome::Rejected(RejectReason::TooShort) => {
            info!(song_id = item.id, "{} → SKIP (too short)", status)
        }
        ItemOutcome::Failed(reason) => {
            warn!(song_id = item.id, title = %item.title, "{} → ERROR: {}", status, reason)
        }
    }
}

/// Race `fut` against cancellation; `None` means cancelled first
async fn interruptible<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = fut => Some(output),
    }
}

//! lyrix-harvest - resumable lyrics corpus harvester
//!
//! Walks an artist's Genius catalog in popularity order and appends cleaned
//! lyrics to a local corpus. Progress is checkpointed so an interrupted run
//! picks up where it left off without duplicating records.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyrix_harvest::config::{ConfigOverrides, HarvestConfig};
use lyrix_harvest::models::HarvestState;
use lyrix_harvest::services::{IngestionController, SongSort};

/// Command-line arguments for lyrix-harvest
#[derive(Parser, Debug)]
#[command(name = "lyrix-harvest")]
#[command(about = "Harvest an artist's lyrics from Genius into a text corpus")]
#[command(version)]
struct Args {
    /// Maximum songs to walk in the catalog [default: 400]
    #[arg(long, env = "LYRIX_MAX_SONGS")]
    max_songs: Option<usize>,

    /// Songs per catalog page [default: 50]
    #[arg(long, env = "LYRIX_PER_PAGE")]
    per_page: Option<u32>,

    /// Song listing order: popularity or title [default: popularity]
    #[arg(long, env = "LYRIX_SORT")]
    sort: Option<SongSort>,

    /// Process only the first N songs (smoke tests)
    #[arg(long)]
    limit: Option<usize>,

    /// Artist to harvest [default: Yeat]
    #[arg(long, env = "LYRIX_ARTIST")]
    artist: Option<String>,

    /// Corpus text file [default: yeat_lyrics.txt]
    #[arg(long, env = "LYRIX_CORPUS")]
    corpus: Option<PathBuf>,

    /// Progress snapshot file [default: scrape_progress.json]
    #[arg(long, env = "LYRIX_PROGRESS")]
    progress: Option<PathBuf>,

    /// Pause after each song, in milliseconds [default: 200]
    #[arg(long)]
    delay_ms: Option<u64>,

    /// TOML config file [default: ~/.config/lyrix/lyrix.toml]
    #[arg(long, env = "LYRIX_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            artist: self.artist.clone(),
            corpus_path: self.corpus.clone(),
            progress_path: self.progress.clone(),
            max_songs: self.max_songs,
            per_page: self.per_page,
            sort: self.sort,
            limit: self.limit,
            item_delay_ms: self.delay_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; a missing file is not an error
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let toml_config = lyrix_common::config::load_config(args.config.as_deref())?;

    // Initialize tracing
    let default_filter = format!("{},reqwest=warn,hyper=warn", toml_config.logging.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting lyrix-harvest v{}", env!("CARGO_PKG_VERSION"));

    let config = HarvestConfig::resolve(args.overrides(), &toml_config)?;
    info!(
        "Corpus: {}, progress: {}",
        config.corpus_path.display(),
        config.progress_path.display()
    );

    let controller = match IngestionController::from_config(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

    let summary = controller.run(&cancel).await;
    info!("{}", summary.statistics.display_string());

    if summary.state == HarvestState::Failed {
        anyhow::bail!(
            "harvest failed: {}",
            summary.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM
async fn cancel_on_shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    token.cancel();
}

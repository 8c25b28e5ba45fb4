use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lens_config::Config;
use lens_notes::{JsonNoteStore, NoteStore};
use lens_ocr::Recording;
use lens_translator::{DeeplTranslator, Translator};
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod capture_context;
pub mod controller;
pub mod events;
pub mod io;
pub mod session;
pub mod state;
pub mod status;
pub mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::session::OverlaySession;
use self::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "lens", about = "Live text overlay with tap-to-translate")]
struct Args {
    /// JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Recorded capture session to replay
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Run without a translator
    #[arg(long)]
    no_translate: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if atty::is(atty::Stream::Stdout) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config);
    if let Some(path) = args.replay {
        config.capture.replay_path = Some(path);
    }
    if args.no_translate {
        config.translator.enabled = false;
    }

    let translator: Option<Arc<dyn Translator>> = if config.translator.is_usable() {
        Some(Arc::new(DeeplTranslator::new(
            config.translator.api_key.clone(),
            config.translator.endpoint.clone(),
        )))
    } else {
        None
    };

    let notes: Arc<dyn NoteStore> = Arc::new(JsonNoteStore::open(&config.notes.path).await?);

    let recording = match (&config.capture.replay_path, config.capture.enabled) {
        (Some(path), true) => Some(Recording::load(path)?),
        _ => None,
    };

    let session = Arc::new(OverlaySession::new(
        config.tracker.clone(),
        config.viewport.size(),
    ));
    tracing::info!("Overlay session {}", session.id());
    let channel_capacity = config.channel_capacity;
    let state = Arc::new(AppState::new(config, session, translator, notes));

    let controller = AppController::new(state, channel_capacity);
    let mut tasks = controller.spawn_tasks(recording);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();

    let drain = async { while tasks.join_next().await.is_some() {} };
    if tokio::time::timeout(Duration::from_secs(2), drain).await.is_err() {
        tracing::warn!("Tasks did not stop in time");
    }

    Ok(())
}

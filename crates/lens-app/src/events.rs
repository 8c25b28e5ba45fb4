use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lens_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod detection;
pub mod notes;
pub mod translation;

use notes::{handle_load_notes, handle_save_note};
use translation::{handle_dismiss, handle_tap};

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    // Warm up the translator so the first tap does not pay for it
    if let Some(translator) = &state.translator {
        let name = translator.metadata().name;
        match translator.prepare().await {
            Ok(()) => tracing::info!("Translator {} ready", name),
            Err(e) => tracing::warn!("Translator {} not ready yet: {}", name, e),
        }
    } else {
        tracing::warn!("Translation disabled");
    }

    handle_load_notes(state.clone(), &app_to_ui_tx).await?;
    let _ = app_to_ui_tx.send(AppEvent::BackendReady).await;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::debug!("[EVENT_LOOP] UI channel closed");
                    break;
                }
            },
        };

        tracing::trace!(
            "[EVENT_LOOP] Event received: {:?}",
            std::mem::discriminant(&event)
        );
        handle_events(state.clone(), &app_to_ui_tx, event).await?;
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

pub async fn handle_events(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::DetectionBatch(batch) => {
            state.session.submit(batch);
        }
        AppEvent::Tap(point) => {
            handle_tap(state, point, app_to_ui_tx).await?;
        }
        AppEvent::DismissTranslation => {
            handle_dismiss(state, app_to_ui_tx).await?;
        }
        AppEvent::SaveNote => {
            handle_save_note(state, app_to_ui_tx).await?;
        }
        AppEvent::LoadNotes => {
            handle_load_notes(state, app_to_ui_tx).await?;
        }
        AppEvent::OcrStatusUpdate { status, capturing } => {
            tracing::info!("OCR status: {} (capturing: {})", status, capturing);
        }
        AppEvent::RegionsChanged(_)
        | AppEvent::RegionSelected(_)
        | AppEvent::TranslationUpdate(_)
        | AppEvent::NotesLoaded(_)
        | AppEvent::BackendReady => {
            // UI-only events, ignore in backend
        }
    }

    Ok(())
}

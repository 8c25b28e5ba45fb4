use kanal::{AsyncReceiver, AsyncSender};
use lens_types::{AppEvent, TrackedRegion, TranslateState};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Push every overlay change to the UI channel
pub async fn forward_regions(
    mut regions: watch::Receiver<Vec<TrackedRegion>>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = regions.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = regions.borrow_and_update().clone();
                if app_to_ui_tx.send(AppEvent::RegionsChanged(current)).await.is_err() {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Headless renderer: logs what a UI would draw
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        render(event);
    }

    tracing::debug!("[UI] Stopped");
    Ok(())
}

fn render(event: AppEvent) {
    match event {
        AppEvent::RegionsChanged(regions) => {
            tracing::debug!("[UI] {} regions", regions.len());
            for region in &regions {
                let r = region.display_rect;
                tracing::trace!(
                    "[UI]   ({:.0}, {:.0}, {:.0}, {:.0}) {}",
                    r.left,
                    r.top,
                    r.right,
                    r.bottom,
                    region.text
                );
            }
        }
        AppEvent::RegionSelected(region) => {
            tracing::info!("[UI] Selected \"{}\"", region.text);
        }
        AppEvent::TranslationUpdate(state) => match state {
            TranslateState::Idle => tracing::info!("[UI] Translation closed"),
            TranslateState::Loading => tracing::info!("[UI] Translating..."),
            TranslateState::Success(text) => tracing::info!("[UI] Translation: {}", text),
            TranslateState::Error(e) => tracing::warn!("[UI] Translation error: {}", e),
        },
        AppEvent::NotesLoaded(notes) => {
            tracing::info!("[UI] {} notes", notes.len());
            for note in notes.iter().take(5) {
                tracing::debug!("[UI]   {} -> {}", note.original_text, note.translated_text);
            }
        }
        AppEvent::OcrStatusUpdate { status, capturing } => {
            tracing::info!("[UI] {} (capturing: {})", status, capturing);
        }
        AppEvent::BackendReady => tracing::info!("[UI] Backend ready"),
        AppEvent::DetectionBatch(_)
        | AppEvent::Tap(_)
        | AppEvent::DismissTranslation
        | AppEvent::SaveNote
        | AppEvent::LoadNotes => {
            // UI -> app events
        }
    }
}

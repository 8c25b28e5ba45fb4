use std::sync::Arc;

use kanal::AsyncSender;
use lens_types::{AppEvent, TranslateState};

use crate::state::AppState;

pub async fn handle_save_note(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (original, translated) = {
        let selection = state.selection.read().await;
        if selection.is_loading() {
            tracing::warn!("Translation still in progress, nothing saved");
            return Ok(());
        }
        match (&selection.region, &selection.translation) {
            (Some(region), TranslateState::Success(text)) => (region.text.clone(), text.clone()),
            _ => {
                tracing::warn!("Nothing to save, no finished translation selected");
                return Ok(());
            }
        }
    };

    match lens_notes::save_translation(state.notes.as_ref(), &original, &translated).await {
        Ok(note) => {
            tracing::info!("Saved note: id={}", note.id);
        }
        Err(e) => {
            tracing::error!("Failed to save note: {e:#}");
            return Ok(());
        }
    }

    handle_load_notes(state, app_to_ui_tx).await
}

pub async fn handle_load_notes(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match state.notes.list_all().await {
        Ok(notes) => {
            tracing::debug!("Loaded {} notes", notes.len());
            let _ = app_to_ui_tx.send(AppEvent::NotesLoaded(notes)).await;
        }
        Err(e) => {
            tracing::error!("Failed to load notes: {e:#}");
        }
    }

    Ok(())
}

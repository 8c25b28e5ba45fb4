use std::sync::Arc;

use anyhow::anyhow;
use kanal::AsyncSender;
use lens_types::{AppEvent, Point, TranslateState};

use crate::state::AppState;

/// Select the region under the tap and translate its text.
///
/// The translation runs on its own task so a dismiss or another tap is
/// handled while the request is in flight; a result for anything but the
/// latest tap is dropped.
pub async fn handle_tap(
    state: Arc<AppState>,
    point: Point,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(region) = state.session.handle_tap(point) else {
        tracing::debug!("Tap at ({}, {}) hit no region", point.x, point.y);
        return Ok(());
    };

    tracing::info!("Selected \"{}\"", region.text);
    let request = {
        let mut selection = state.selection.write().await;
        selection.request += 1;
        selection.region = Some(region.clone());
        selection.translation = TranslateState::Loading;
        selection.request
    };

    let _ = app_to_ui_tx
        .send(AppEvent::RegionSelected(region.clone()))
        .await;
    let _ = app_to_ui_tx
        .send(AppEvent::TranslationUpdate(TranslateState::Loading))
        .await;

    let tx = app_to_ui_tx.clone();
    tokio::spawn(async move {
        let outcome = match translate_text(&state, &region.text).await {
            Ok(text) => TranslateState::Success(text),
            Err(e) => {
                tracing::warn!("Translation failed: {e:#}");
                TranslateState::Error(e.to_string())
            }
        };

        if apply_translation(&state, request, outcome.clone()).await {
            let _ = tx.send(AppEvent::TranslationUpdate(outcome)).await;
        } else {
            tracing::debug!("Selection changed, dropping translation");
        }
    });

    Ok(())
}

async fn translate_text(state: &AppState, text: &str) -> anyhow::Result<String> {
    let translator = state
        .translator
        .as_ref()
        .ok_or_else(|| anyhow!("Translation disabled"))?;

    translator.prepare().await?;

    let (from, to) = {
        let config = state.config.read().await;
        (
            config.translator.from_lang.clone(),
            config.translator.to_lang.clone(),
        )
    };

    let translation = translator.translate(text, from, to).await?;
    Ok(translation.text)
}

async fn apply_translation(state: &AppState, request: u64, outcome: TranslateState) -> bool {
    let mut selection = state.selection.write().await;
    if selection.request != request || selection.region.is_none() {
        return false;
    }
    selection.translation = outcome;
    true
}

pub async fn handle_dismiss(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    {
        let mut selection = state.selection.write().await;
        if selection.region.is_none() {
            return Ok(());
        }
        // request counter survives so in-flight results stay stale
        selection.region = None;
        selection.translation = TranslateState::Idle;
    }

    tracing::debug!("Translation dismissed");
    let _ = app_to_ui_tx
        .send(AppEvent::TranslationUpdate(TranslateState::Idle))
        .await;

    Ok(())
}

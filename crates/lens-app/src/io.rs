use kanal::AsyncSender;
use lens_ocr::{RecordedEvent, Recording};
use lens_types::{AppEvent, Point};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::capture_context::CaptureContext;
use crate::events::detection::handle_frame;

/// Drive the app from a recorded capture session.
///
/// Frames go through the recognizer into the overlay session; taps, saves and
/// dismissals are sent the way the UI would send them.
pub async fn replay_io(
    ctx: CaptureContext,
    recording: Recording,
    ui_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let (realtime, linger) = {
        let config = ctx.state.config.read().await;
        (config.capture.realtime, config.tracker.clear_debounce())
    };

    tracing::info!(
        "Replaying {} events (realtime: {})",
        recording.events().len(),
        realtime
    );
    // a new capture stream starts from an empty overlay
    ctx.state.session.reset().await;
    send_status(&ctx, "Capturing", true).await;

    let start = Instant::now();
    for event in recording.events() {
        if realtime {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Replay stopping");
                    return Ok(());
                }
                _ = tokio::time::sleep_until(start + event.timestamp()) => {}
            }
        } else if cancel.is_cancelled() {
            tracing::info!("Replay stopping");
            return Ok(());
        }

        match event {
            RecordedEvent::Frame(frame) => handle_frame(&ctx, frame.frame()).await,
            RecordedEvent::Tap { x, y, .. } => {
                ui_to_app_tx.send(AppEvent::Tap(Point::new(*x, *y))).await?;
            }
            RecordedEvent::Save { .. } => ui_to_app_tx.send(AppEvent::SaveNote).await?,
            RecordedEvent::Dismiss { .. } => {
                ui_to_app_tx.send(AppEvent::DismissTranslation).await?;
            }
        }
    }

    send_status(&ctx, "Replay finished", false).await;

    // let a trailing empty frame run out its debounce before reporting done
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(linger) => {}
    }

    tracing::info!("Replay done");
    Ok(())
}

async fn send_status(ctx: &CaptureContext, status: &str, capturing: bool) {
    {
        let mut ocr = ctx.state.status.ocr.write().await;
        ocr.capturing = capturing;
        ocr.current_message = status.to_string();
    }

    let _ = ctx
        .event_tx
        .send(AppEvent::OcrStatusUpdate {
            status: status.to_string(),
            capturing,
        })
        .await;
}

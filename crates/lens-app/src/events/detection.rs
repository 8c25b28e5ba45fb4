use lens_ocr::Frame;
use lens_types::AppEvent;

use crate::capture_context::CaptureContext;

/// Recognize one frame and hand the result to the overlay session.
///
/// A failed recognition still submits an empty batch, so the overlay
/// debounces away instead of freezing on stale boxes.
pub async fn handle_frame(ctx: &CaptureContext, frame: Frame) {
    let lines = match ctx.recognizer.recognize(&frame).await {
        Ok(lines) => {
            ctx.state.status.ocr.write().await.record_frame(frame.captured_at);
            lines
        }
        Err(e) => {
            tracing::warn!("[OCR] Frame {} failed: {e:#}", frame.sequence);
            let message = format!("Failed: {}", e);
            ctx.state.status.ocr.write().await.record_error(&message);
            let _ = ctx
                .event_tx
                .send(AppEvent::OcrStatusUpdate {
                    status: message,
                    capturing: true,
                })
                .await;
            Vec::new()
        }
    };

    tracing::trace!("[OCR] Frame {}: {} lines", frame.sequence, lines.len());
    ctx.state.session.submit_detection_batch(
        lines,
        frame.image_size,
        frame.rotation_degrees,
        frame.captured_at,
    );
}

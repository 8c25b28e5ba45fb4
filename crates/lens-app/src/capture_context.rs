use std::sync::Arc;

use kanal::AsyncSender;
use lens_ocr::TextRecognizer;
use lens_types::AppEvent;

use crate::state::AppState;

/// Shared dependencies of the capture side
#[derive(Clone)]
pub struct CaptureContext {
    pub state: Arc<AppState>,
    pub recognizer: Arc<dyn TextRecognizer>,
    /// Status updates towards the UI
    pub event_tx: AsyncSender<AppEvent>,
}

impl CaptureContext {
    pub fn new(
        state: Arc<AppState>,
        recognizer: Arc<dyn TextRecognizer>,
        event_tx: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            state,
            recognizer,
            event_tx,
        }
    }
}

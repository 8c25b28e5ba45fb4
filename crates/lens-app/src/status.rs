use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

/// Capture status information
#[derive(Clone, Debug, Default)]
pub struct OcrStatus {
    pub capturing: bool,
    /// Stream time of the last recognized frame
    pub last_frame_at: Option<Duration>,
    pub frame_count: u64,
    pub error_count: u64,
    pub current_message: String,
}

impl OcrStatus {
    pub fn record_frame(&mut self, captured_at: Duration) {
        self.frame_count += 1;
        self.last_frame_at = Some(captured_at);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error_count += 1;
        self.current_message = message.into();
    }
}

/// Application status
pub struct AppStatus {
    pub ocr: Arc<RwLock<OcrStatus>>,
}

impl AppStatus {
    pub fn new() -> Self {
        Self {
            ocr: Arc::new(RwLock::new(OcrStatus::default())),
        }
    }
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::new()
    }
}

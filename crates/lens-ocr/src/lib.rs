mod recognizer;
mod recording;

pub use recognizer::RecordedRecognizer;
pub use recording::{RecordedEvent, RecordedFrame, Recording};

use std::time::Duration;

use lens_types::{DetectedLine, ImageSize};

/// One camera frame handed to a recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub sequence: u64,
    pub image_size: ImageSize,
    pub rotation_degrees: i32,
    /// Time since capture started
    pub captured_at: Duration,
}

/// Text recognition engine
#[async_trait::async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognized lines with boxes in sensor-image pixels
    async fn recognize(&self, frame: &Frame) -> anyhow::Result<Vec<DetectedLine>>;
}

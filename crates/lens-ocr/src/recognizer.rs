use std::collections::HashMap;

use anyhow::{Result, bail};
use async_trait::async_trait;
use lens_types::DetectedLine;

use crate::recording::Recording;
use crate::{Frame, TextRecognizer};

/// Answers with what the engine produced when the session was recorded
pub struct RecordedRecognizer {
    results: HashMap<u64, std::result::Result<Vec<DetectedLine>, String>>,
}

impl RecordedRecognizer {
    pub fn new(recording: &Recording) -> Self {
        let results = recording
            .frames()
            .map(|frame| {
                let result = match &frame.error {
                    Some(message) => Err(message.clone()),
                    None => Ok(frame.lines.clone()),
                };
                (frame.sequence, result)
            })
            .collect();

        Self { results }
    }
}

#[async_trait]
impl TextRecognizer for RecordedRecognizer {
    async fn recognize(&self, frame: &Frame) -> Result<Vec<DetectedLine>> {
        match self.results.get(&frame.sequence) {
            Some(Ok(lines)) => Ok(lines.clone()),
            Some(Err(message)) => bail!("Recognition failed: {}", message),
            None => bail!("No recorded result for frame {}", frame.sequence),
        }
    }
}

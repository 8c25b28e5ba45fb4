use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_realtime() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Recorded capture session to replay instead of a live camera
    pub replay_path: Option<PathBuf>,
    /// Pace replayed frames by their timestamps
    #[serde(default = "default_realtime")]
    pub realtime: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            replay_path: None,
            realtime: default_realtime(),
        }
    }
}

use lens_types::ImageSize;
use serde::{Deserialize, Serialize};

fn default_width() -> u32 {
    1080
}

fn default_height() -> u32 {
    1920
}

/// Size of the preview surface the overlay is drawn on
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }
}

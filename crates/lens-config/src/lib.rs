use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lens_core::TrackerConfig;
use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::notes::NotesConfig;
use self::translator::TranslatorConfig;
use self::viewport::ViewportConfig;

pub mod capture;
pub mod notes;
pub mod translator;
pub mod viewport;

fn default_channel_capacity() -> usize {
    64
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub viewport: ViewportConfig,
    pub translator: TranslatorConfig,
    pub notes: NotesConfig,
    pub capture: CaptureConfig,

    /// Capacity of the ui <-> app channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            viewport: ViewportConfig::default(),
            translator: TranslatorConfig::default(),
            notes: NotesConfig::default(),
            capture: CaptureConfig::default(),

            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file, then apply environment overrides
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        tracing::info!("Loading config from {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// `load`, falling back to `new` when the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e:#}, using default config");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Some(width) = env_parse("LENS_VIEWPORT_WIDTH") {
            self.viewport.width = width;
        }
        if let Some(height) = env_parse("LENS_VIEWPORT_HEIGHT") {
            self.viewport.height = height;
        }
        if let Ok(path) = env::var("LENS_NOTES_PATH") {
            self.notes.path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("LENS_REPLAY_PATH") {
            self.capture.replay_path = Some(PathBuf::from(path));
        }
        if let Ok(key) = env::var("DEEPL_API_KEY") {
            // a key in the environment opts into translation
            self.translator.enabled = !key.trim().is_empty();
            self.translator.api_key = key;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

use serde::{Deserialize, Serialize};

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "ko".to_string()
}

fn default_endpoint() -> String {
    "https://api-free.deepl.com/v2".to_string()
}

/// Remote translation settings. Disabled unless a key is configured.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    pub enabled: bool,
    /// Language the camera text is read in
    #[serde(default = "default_source_lang")]
    pub from_lang: String,
    #[serde(default = "default_target_lang")]
    pub to_lang: String,
    pub api_key: String,
    /// Base of the DeepL v2 API; `/translate` and `/usage` are appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from_lang: default_source_lang(),
            to_lang: default_target_lang(),
            api_key: String::new(),
            endpoint: default_endpoint(),
        }
    }
}

impl TranslatorConfig {
    /// Enabled and holding a key
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

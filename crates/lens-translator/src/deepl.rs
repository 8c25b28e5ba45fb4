use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

pub struct DeeplTranslator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    ready: AtomicBool,
}

impl DeeplTranslator {
    /// `endpoint` is the API base, e.g. `https://api-free.deepl.com/v2`
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            ready: AtomicBool::new(false),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }
}

fn check_status(status: StatusCode) -> Result<(), TranslateError> {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(TranslateError::RateLimitExceeded),
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
            Err(TranslateError::AuthenticationError)
        }
        s if !s.is_success() => Err(TranslateError::ApiError(format!("HTTP {}", s))),
        _ => Ok(()),
    }
}

fn first_translation(json: &serde_json::Value) -> Result<String, TranslateError> {
    json["translations"]
        .get(0)
        .and_then(|t| t["text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn prepare(&self) -> Result<(), TranslateError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        if self.api_key.trim().is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        // the usage endpoint is the cheapest authenticated call
        let response = self
            .client
            .get(self.url("usage"))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        check_status(response.status())?;

        self.ready.store(true, Ordering::Release);
        tracing::info!("DeepL translator ready");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        if !self.is_ready() {
            return Err(TranslateError::NotReady);
        }

        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let source_lang = from.to_uppercase();
        let target_lang = to.to_uppercase();
        let params = [
            ("text", text),
            ("source_lang", source_lang.as_str()),
            ("target_lang", target_lang.as_str()),
        ];

        let response = self
            .client
            .post(self.url("translate"))
            .header("Authorization", self.auth_header())
            .form(&params)
            .send()
            .await?;

        check_status(response.status())?;

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        Ok(Translation {
            text: first_translation(&json)?,
            from,
            to,
            provider: "deepl".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepL".to_string(),
            requires_api_key: true,
        }
    }
}

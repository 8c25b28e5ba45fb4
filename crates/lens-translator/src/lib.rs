mod deepl;

pub use deepl::DeeplTranslator;

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// One-time setup (credential check, model download, ...).
    ///
    /// Idempotent: calling it again after success is a cheap no-op.
    async fn prepare(&self) -> Result<(), TranslateError>;

    /// Whether `prepare` has succeeded
    fn is_ready(&self) -> bool;

    /// Translate text from source to target language.
    ///
    /// Fails with [`TranslateError::NotReady`] until `prepare` has succeeded.
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translator is not ready")]
    NotReady,

    #[error("Nothing to translate")]
    EmptyInput,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}

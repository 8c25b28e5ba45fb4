mod event_flow_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use lens_config::Config;
use lens_core::TrackerConfig;
use lens_notes::{MemoryNoteStore, NoteStore};
use lens_translator::{ProviderMetadata, TranslateError, Translation, Translator};
use lens_types::{DetectedLine, DetectionBatch, ImageSize, Rect};

use crate::session::OverlaySession;
use crate::state::AppState;

/// Sensor and display are the same size, so display rects equal sensor rects
pub const SIZE: ImageSize = ImageSize::new(1000, 1000);

pub fn batch(lines: &[(&str, Rect)], at_ms: u64) -> DetectionBatch {
    DetectionBatch {
        lines: lines
            .iter()
            .map(|(text, rect)| DetectedLine::new(*text, *rect))
            .collect(),
        image_size: SIZE,
        rotation_degrees: 0,
        timestamp: Duration::from_millis(at_ms),
    }
}

pub fn new_session() -> Arc<OverlaySession> {
    Arc::new(OverlaySession::new(TrackerConfig::default(), SIZE))
}

/// Yield until the worker has applied `count` batches
pub async fn settle(session: &OverlaySession, count: u64) {
    for _ in 0..1000 {
        if session.applied() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("worker applied {} of {} batches", session.applied(), count);
}

pub fn app_state(translator: Option<Arc<dyn Translator>>) -> Arc<AppState> {
    let mut config = Config::default();
    config.viewport.width = SIZE.width;
    config.viewport.height = SIZE.height;

    let notes: Arc<dyn NoteStore> = Arc::new(MemoryNoteStore::new());
    Arc::new(AppState::new(config, new_session(), translator, notes))
}

/// Tags the text with the target language; anything containing "Broken" fails
pub struct MockTranslator {
    delay: Duration,
    ready: AtomicBool,
    pub prepare_calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ready: AtomicBool::new(false),
            prepare_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Translator for MockTranslator {
    async fn prepare(&self) -> Result<(), TranslateError> {
        self.prepare_calls.fetch_add(1, Ordering::SeqCst);
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn translate(
        &self,
        text: &str,
        from: String,
        to: String,
    ) -> Result<Translation, TranslateError> {
        if !self.is_ready() {
            return Err(TranslateError::NotReady);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if text.contains("Broken") {
            return Err(TranslateError::ApiError("upstream unavailable".to_string()));
        }

        Ok(Translation {
            text: format!("[{}] {}", to, text),
            from,
            to,
            provider: "mock".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Mock".to_string(),
            requires_api_key: false,
        }
    }
}

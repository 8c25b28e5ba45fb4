use std::sync::Arc;

use lens_config::Config;
use lens_notes::NoteStore;
use lens_translator::Translator;
use lens_types::{TrackedRegion, TranslateState};
use tokio::sync::RwLock;

use crate::session::OverlaySession;
use crate::status::AppStatus;

/// What the translation card currently shows
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub region: Option<TrackedRegion>,
    pub translation: TranslateState,
    /// Bumped per tap; only the latest request may fill the card
    pub request: u64,
}

impl Selection {
    pub fn is_loading(&self) -> bool {
        self.translation == TranslateState::Loading
    }
}

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub session: Arc<OverlaySession>,
    pub translator: Option<Arc<dyn Translator>>,
    pub notes: Arc<dyn NoteStore>,
    pub selection: RwLock<Selection>,
    pub status: AppStatus,
}

impl AppState {
    pub fn new(
        config: Config,
        session: Arc<OverlaySession>,
        translator: Option<Arc<dyn Translator>>,
        notes: Arc<dyn NoteStore>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            session,
            translator,
            notes,
            selection: RwLock::new(Selection::default()),
            status: AppStatus::new(),
        }
    }
}

//! Tap -> translate -> save flow through the event loop

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use lens_translator::Translator;
use lens_types::{AppEvent, Point, Rect, TranslateState};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::{MockTranslator, app_state, batch, settle};
use crate::events::event_loop;
use crate::state::AppState;

struct Harness {
    state: Arc<AppState>,
    ui_tx: AsyncSender<AppEvent>,
    app_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
}

impl Harness {
    async fn start(translator: Option<Arc<dyn Translator>>) -> Self {
        let state = app_state(translator);
        let (ui_tx, ui_rx) = kanal::bounded_async(16);
        let (app_tx, app_rx) = kanal::bounded_async(64);
        let cancel = CancellationToken::new();

        tokio::spawn(state.session.clone().run());
        tokio::spawn(event_loop(state.clone(), ui_rx, app_tx, cancel.clone()));

        let harness = Self {
            state,
            ui_tx,
            app_rx,
            cancel,
        };

        assert!(matches!(harness.next().await, AppEvent::NotesLoaded(notes) if notes.is_empty()));
        assert!(matches!(harness.next().await, AppEvent::BackendReady));
        harness
    }

    async fn next(&self) -> AppEvent {
        match timeout(Duration::from_secs(5), self.app_rx.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => panic!("Channel error: {}", e),
            Err(_) => panic!("Timeout - event never arrived!"),
        }
    }

    async fn send(&self, event: AppEvent) {
        self.ui_tx.send(event).await.expect("send failed");
    }

    async fn show(&self, lines: &[(&str, Rect)]) {
        let applied = self.state.session.applied();
        self.state.session.submit(batch(lines, 0));
        settle(&self.state.session, applied + 1).await;
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.state.session.shutdown();
    }
}

const HELLO: Rect = Rect::new(100.0, 300.0, 800.0, 400.0);

#[tokio::test]
async fn tap_translates_the_selected_region() {
    let translator = Arc::new(MockTranslator::new());
    let h = Harness::start(Some(translator.clone())).await;
    h.show(&[("Hello", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;

    match h.next().await {
        AppEvent::RegionSelected(region) => assert_eq!(region.text, "Hello"),
        other => panic!("Wrong event type: {:?}", other),
    }
    assert!(matches!(
        h.next().await,
        AppEvent::TranslationUpdate(TranslateState::Loading)
    ));
    match h.next().await {
        AppEvent::TranslationUpdate(TranslateState::Success(text)) => {
            assert_eq!(text, "[ko] Hello")
        }
        other => panic!("Wrong event type: {:?}", other),
    }

    let selection = h.state.selection.read().await.clone();
    assert_eq!(selection.region.as_ref().unwrap().text, "Hello");
    assert!(!selection.is_loading());
    // warm-up prepare plus the one on tap
    assert_eq!(translator.prepare_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn tap_outside_every_region_is_ignored() {
    let h = Harness::start(Some(Arc::new(MockTranslator::new()))).await;
    h.show(&[("Hello", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(50.0, 50.0))).await;
    h.send(AppEvent::LoadNotes).await;

    // nothing was emitted for the tap
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(_)));
    assert!(h.state.selection.read().await.region.is_none());
}

#[tokio::test]
async fn failed_translation_is_reported_and_not_saved() {
    let h = Harness::start(Some(Arc::new(MockTranslator::new()))).await;
    h.show(&[("Broken sign", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
    assert!(matches!(h.next().await, AppEvent::RegionSelected(_)));
    assert!(matches!(h.next().await, AppEvent::TranslationUpdate(TranslateState::Loading)));
    match h.next().await {
        AppEvent::TranslationUpdate(TranslateState::Error(message)) => {
            assert!(message.contains("upstream unavailable"))
        }
        other => panic!("Wrong event type: {:?}", other),
    }

    h.send(AppEvent::SaveNote).await;
    h.send(AppEvent::LoadNotes).await;
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(notes) if notes.is_empty()));
}

#[tokio::test]
async fn disabled_translator_reports_an_error() {
    let h = Harness::start(None).await;
    h.show(&[("Hello", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
    assert!(matches!(h.next().await, AppEvent::RegionSelected(_)));
    assert!(matches!(h.next().await, AppEvent::TranslationUpdate(TranslateState::Loading)));
    assert_eq!(
        h.next().await.into_translation(),
        TranslateState::Error("Translation disabled".to_string())
    );
}

#[tokio::test]
async fn save_note_stores_the_translation_newest_first() {
    let h = Harness::start(Some(Arc::new(MockTranslator::new()))).await;

    for (text, expected) in [("Hello", "[ko] Hello"), ("Exit", "[ko] Exit")] {
        h.show(&[(text, HELLO)]).await;
        h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
        assert!(matches!(h.next().await, AppEvent::RegionSelected(_)));
        assert!(matches!(h.next().await, AppEvent::TranslationUpdate(TranslateState::Loading)));
        assert_eq!(
            h.next().await.into_translation(),
            TranslateState::Success(expected.to_string())
        );

        h.send(AppEvent::SaveNote).await;
        assert!(matches!(h.next().await, AppEvent::NotesLoaded(_)));
    }

    h.send(AppEvent::LoadNotes).await;
    match h.next().await {
        AppEvent::NotesLoaded(notes) => {
            assert_eq!(notes.len(), 2);
            assert_eq!(notes[0].original_text, "Exit");
            assert_eq!(notes[0].translated_text, "[ko] Exit");
            assert_eq!(notes[1].original_text, "Hello");
        }
        other => panic!("Wrong event type: {:?}", other),
    }
}

#[tokio::test]
async fn dismiss_closes_the_card() {
    let h = Harness::start(Some(Arc::new(MockTranslator::new()))).await;
    h.show(&[("Hello", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
    for _ in 0..3 {
        h.next().await;
    }

    h.send(AppEvent::DismissTranslation).await;
    assert_eq!(h.next().await.into_translation(), TranslateState::Idle);

    let selection = h.state.selection.read().await.clone();
    assert!(selection.region.is_none());
    assert_eq!(selection.translation, TranslateState::Idle);

    // with nothing selected, saving is a no-op
    h.send(AppEvent::SaveNote).await;
    h.send(AppEvent::LoadNotes).await;
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(notes) if notes.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn translation_finishing_after_dismiss_is_dropped() {
    let translator = Arc::new(MockTranslator::with_delay(Duration::from_secs(1)));
    let h = Harness::start(Some(translator)).await;
    h.show(&[("Hello", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
    assert!(matches!(h.next().await, AppEvent::RegionSelected(_)));
    assert!(matches!(h.next().await, AppEvent::TranslationUpdate(TranslateState::Loading)));

    h.send(AppEvent::DismissTranslation).await;
    assert_eq!(h.next().await.into_translation(), TranslateState::Idle);

    tokio::time::sleep(Duration::from_secs(2)).await;

    h.send(AppEvent::LoadNotes).await;
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(_)));
    assert_eq!(h.state.selection.read().await.translation, TranslateState::Idle);
}

#[tokio::test(start_paused = true)]
async fn repeated_tap_on_the_same_region_reports_once() {
    let translator = Arc::new(MockTranslator::with_delay(Duration::from_secs(1)));
    let h = Harness::start(Some(translator)).await;
    h.show(&[("Hello", HELLO)]).await;

    for _ in 0..2 {
        h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
        assert!(matches!(h.next().await, AppEvent::RegionSelected(_)));
        assert!(matches!(h.next().await, AppEvent::TranslationUpdate(TranslateState::Loading)));
    }
    assert_eq!(h.state.selection.read().await.request, 2);

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(
        h.next().await.into_translation(),
        TranslateState::Success("[ko] Hello".to_string())
    );
    // the first request's result was dropped
    h.send(AppEvent::LoadNotes).await;
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(_)));
}

#[tokio::test(start_paused = true)]
async fn save_while_translating_stores_nothing() {
    let translator = Arc::new(MockTranslator::with_delay(Duration::from_secs(1)));
    let h = Harness::start(Some(translator)).await;
    h.show(&[("Hello", HELLO)]).await;

    h.send(AppEvent::Tap(Point::new(300.0, 350.0))).await;
    assert!(matches!(h.next().await, AppEvent::RegionSelected(_)));
    assert!(matches!(h.next().await, AppEvent::TranslationUpdate(TranslateState::Loading)));
    assert!(h.state.selection.read().await.is_loading());

    h.send(AppEvent::SaveNote).await;
    h.send(AppEvent::LoadNotes).await;
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(notes) if notes.is_empty()));

    // once the translation lands the same save goes through
    assert!(matches!(
        h.next().await.into_translation(),
        TranslateState::Success(_)
    ));
    h.send(AppEvent::SaveNote).await;
    assert!(matches!(h.next().await, AppEvent::NotesLoaded(notes) if notes.len() == 1));
}

#[tokio::test]
async fn detection_batch_event_reaches_the_overlay() {
    let h = Harness::start(None).await;
    let mut regions = h.state.session.subscribe();

    h.send(AppEvent::DetectionBatch(batch(&[("Hello", HELLO)], 0)))
        .await;

    timeout(Duration::from_secs(5), regions.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(regions.borrow().len(), 1);
}

trait TranslationEvent {
    fn into_translation(self) -> TranslateState;
}

impl TranslationEvent for AppEvent {
    fn into_translation(self) -> TranslateState {
        match self {
            AppEvent::TranslationUpdate(state) => state,
            other => panic!("Wrong event type: {:?}", other),
        }
    }
}

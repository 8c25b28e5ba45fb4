use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lens_ocr::{RecordedRecognizer, Recording};
use lens_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::capture_context::CaptureContext;
use crate::events::event_loop;
use crate::io::replay_io;
use crate::state::AppState;
use crate::ui::{forward_regions, ui_loop};

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            // overlay updates arrive at frame rate
            app_to_ui: kanal::bounded_async(capacity * 4),
            ui_to_app: kanal::bounded_async(capacity),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, channel_capacity: usize) -> Self {
        Self {
            channels: ChannelSet::new(channel_capacity.max(1)),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, recording: Option<Recording>) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Overlay worker
        tasks.spawn(self.state.session.clone().run());

        // Overlay -> UI
        tasks.spawn(forward_regions(
            self.state.session.subscribe(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Capture
        if let Some(recording) = recording {
            let ctx = CaptureContext::new(
                self.state.clone(),
                Arc::new(RecordedRecognizer::new(&recording)),
                self.channels.app_to_ui.0.clone(),
            );
            tasks.spawn(replay_io(
                ctx,
                recording,
                self.channels.ui_to_app.0.clone(),
                self.cancel_token.child_token(),
            ));
        } else {
            tracing::warn!("No capture source configured, overlay stays empty");
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.state.session.shutdown();
        self.cancel_token.cancel();
    }
}

//! Overlay session: the asynchronous shell around [`BoxTracker`].
//!
//! Detection batches go into a single-slot inbox. A newer batch replaces one
//! that the worker has not picked up yet, while a batch already being applied
//! always finishes first, since transitions run under the tracker lock. The
//! current region set is published through a `watch` channel for renderers and
//! read back for tap routing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lens_core::{BoxTracker, ClearTicket, GeometryError, TrackerConfig, TrackerState, TrackerUpdate};
use lens_types::{DetectedLine, DetectionBatch, ImageSize, Point, TrackedRegion};
use tokio::sync::{Mutex as AsyncMutex, Notify, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub struct OverlaySession {
    id: Uuid,
    tracker: Arc<AsyncMutex<BoxTracker>>,
    inbox: Mutex<Option<DetectionBatch>>,
    inbox_ready: Notify,
    regions_tx: Arc<watch::Sender<Vec<TrackedRegion>>>,
    cancel: CancellationToken,
    applied: AtomicU64,
    superseded: AtomicU64,
}

impl OverlaySession {
    pub fn new(config: TrackerConfig, viewport: ImageSize) -> Self {
        let (regions_tx, _) = watch::channel(Vec::new());

        Self {
            id: Uuid::new_v4(),
            tracker: Arc::new(AsyncMutex::new(BoxTracker::new(config, viewport))),
            inbox: Mutex::new(None),
            inbox_ready: Notify::new(),
            regions_tx: Arc::new(regions_tx),
            cancel: CancellationToken::new(),
            applied: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Feed-in for the recognizer side
    pub fn submit_detection_batch(
        &self,
        lines: Vec<DetectedLine>,
        image_size: ImageSize,
        rotation_degrees: i32,
        timestamp: Duration,
    ) {
        self.submit(DetectionBatch {
            lines,
            image_size,
            rotation_degrees,
            timestamp,
        });
    }

    pub fn submit(&self, batch: DetectionBatch) {
        if self.cancel.is_cancelled() {
            tracing::debug!("[OVERLAY] Session closed, dropping batch");
            return;
        }

        let previous = self
            .inbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(batch);

        if previous.is_some() {
            self.superseded.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("[OVERLAY] Superseded a pending batch");
        }

        self.inbox_ready.notify_one();
    }

    /// Worker applying batches one at a time until shutdown
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        tracing::info!("[OVERLAY] Session {} started", self.id);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = self.inbox_ready.notified() => {}
            }

            let batch = self
                .inbox
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();

            if let Some(batch) = batch {
                self.apply(batch).await;
            }
        }

        tracing::info!("[OVERLAY] Session {} stopped", self.id);
        Ok(())
    }

    async fn apply(&self, batch: DetectionBatch) {
        let mut tracker = self.tracker.lock().await;

        if self.cancel.is_cancelled() {
            tracing::debug!("[OVERLAY] Discarding batch received before teardown");
            return;
        }

        // the stream clock can pass a deadline before the timer task wakes
        if tracker.tick(batch.timestamp) {
            self.publish(&tracker);
        }

        match tracker.submit(&batch) {
            TrackerUpdate::Replaced => self.publish(&tracker),
            TrackerUpdate::ClearScheduled(ticket) => {
                let delay = ticket.deadline.saturating_sub(batch.timestamp);
                if delay.is_zero() {
                    // absence already outlasted the debounce
                    if tracker.expire(ticket) {
                        self.publish(&tracker);
                    }
                } else {
                    self.schedule_clear(ticket, delay);
                }
            }
            TrackerUpdate::Unchanged => {}
        }

        self.applied.fetch_add(1, Ordering::Release);
    }

    fn schedule_clear(&self, ticket: ClearTicket, delay: Duration) {
        let tracker = Arc::clone(&self.tracker);
        let regions_tx = Arc::clone(&self.regions_tx);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let mut tracker = tracker.lock().await;
            if cancel.is_cancelled() {
                return;
            }
            if tracker.expire(ticket) {
                regions_tx.send_replace(Vec::new());
            }
        });
    }

    fn publish(&self, tracker: &BoxTracker) {
        self.regions_tx.send_replace(tracker.regions().to_vec());
    }

    /// Change stream of the current regions
    pub fn subscribe(&self) -> watch::Receiver<Vec<TrackedRegion>> {
        self.regions_tx.subscribe()
    }

    /// Snapshot of the current regions in render order
    pub fn regions(&self) -> Vec<TrackedRegion> {
        self.regions_tx.borrow().clone()
    }

    /// Region under a display-space tap, if any
    pub fn handle_tap(&self, point: Point) -> Option<TrackedRegion> {
        let regions = self.regions_tx.borrow();
        lens_core::route(point, &regions).cloned()
    }

    pub async fn set_viewport(&self, viewport: ImageSize) -> Result<(), GeometryError> {
        let mut tracker = self.tracker.lock().await;
        tracker.set_viewport(viewport)?;
        self.publish(&tracker);
        Ok(())
    }

    /// Forget everything, as after a camera restart
    pub async fn reset(&self) {
        let mut tracker = self.tracker.lock().await;
        tracker.reset();
        self.publish(&tracker);
    }

    pub async fn state(&self) -> TrackerState {
        self.tracker.lock().await.state()
    }

    /// Stop applying batches; pending clears never fire afterwards
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.inbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Batches applied so far
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Acquire)
    }

    /// Batches replaced before the worker picked them up
    pub fn superseded(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }
}

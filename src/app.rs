//! Application Coordinator
//!
//! Wires the UI-thread session state to the background recognition worker,
//! routes gestures to the ROI, and applies the placement failure policy.

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ar::{Annotation, AnnotationPlacer, ArFrame, PlacementResult};
use crate::capture::CameraFrame;
use crate::config::AppConfig;
use crate::geometry::{Point, Rect, Size};
use crate::overlay::{BannerKind, BannerQueue, DragTrack, GestureEvent};
use crate::shared::{SessionState, WorkerEvent, WorkerRequest};
use crate::vision::{RecognitionPipeline, Recognizer};

/// Frames queued for the worker before new ones are dropped
const WORKER_QUEUE_DEPTH: usize = 1;

/// Main application coordinator
pub struct LexiconApp {
    /// Session state shared with the host UI
    pub state: Arc<RwLock<SessionState>>,
    placer: AnnotationPlacer,
    banners: BannerQueue,
    to_worker: Sender<WorkerRequest>,
    from_worker: Receiver<WorkerEvent>,
    worker_handle: Option<JoinHandle<()>>,
}

impl LexiconApp {
    /// Create the coordinator and start the recognition worker
    pub fn new<R>(config: AppConfig, recognizer: R) -> Result<Self>
    where
        R: Recognizer + Send + 'static,
    {
        config.validate()?;

        let pipeline = RecognitionPipeline::with_config(recognizer, config.vision_config());
        let placer = AnnotationPlacer::new(config.placement.annotation_scale);
        let banners = BannerQueue::new(config.banner_config());

        let (to_worker, worker_rx) = bounded(WORKER_QUEUE_DEPTH);
        let (worker_tx, from_worker) = unbounded();

        let handle = std::thread::Builder::new()
            .name("recognition".into())
            .spawn(move || run_worker(pipeline, worker_rx, worker_tx))
            .context("Failed to spawn recognition worker")?;
        info!("Recognition worker started");

        Ok(Self {
            state: Arc::new(RwLock::new(SessionState::new(config))),
            placer,
            banners,
            to_worker,
            from_worker,
            worker_handle: Some(handle),
        })
    }

    /// Get current shared state
    pub fn state(&self) -> Arc<RwLock<SessionState>> {
        self.state.clone()
    }

    /// The container was measured or changed size
    pub fn on_container_resized(&self, size: Size) -> Rect {
        let mut state = self.state.write();
        state.observe_container_size(size);
        state.roi()
    }

    /// A touch went down; starts a gesture on whatever it hit
    pub fn on_touch_began(&self, point: Point) -> Option<DragTrack> {
        let mut state = self.state.write();
        let track = state.track_for_touch(point)?;
        state.on_gesture(track, GestureEvent::began());
        Some(track)
    }

    /// Forward a gesture event; returns the rect to draw
    pub fn on_gesture(&self, track: DragTrack, event: GestureEvent) -> Rect {
        self.state.write().on_gesture(track, event)
    }

    /// Hand a camera frame to the worker. Returns false if it was dropped.
    pub fn submit_frame(&self, frame: CameraFrame) -> bool {
        let (roi, screen) = {
            let state = self.state.read();
            match state.container() {
                Some(screen) => (state.roi(), screen),
                None => return false,
            }
        };

        let sequence = frame.sequence;
        match self.to_worker.try_send(WorkerRequest::Recognize { frame, roi, screen }) {
            Ok(()) => {
                self.state.write().runtime.frames_submitted += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                debug!("worker busy, dropping frame {}", sequence);
                self.state.write().runtime.frames_dropped += 1;
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("recognition worker is gone, dropping frame {}", sequence);
                false
            }
        }
    }

    /// Apply every finished recognition without blocking; returns how many were applied
    pub fn poll_recognitions(&self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.from_worker.try_recv() {
            if self.apply_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait up to `timeout` for one recognition and apply it
    pub fn wait_recognition(&self, timeout: Duration) -> bool {
        match self.from_worker.recv_timeout(timeout) {
            Ok(event) => self.apply_event(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn apply_event(&self, event: WorkerEvent) -> bool {
        match event {
            WorkerEvent::Recognized { sequence, outcome } => {
                debug!("frame {} -> {:?}", sequence, outcome.label());
                self.state.write().apply_recognition(outcome);
                true
            }
            WorkerEvent::Stopped => false,
        }
    }

    /// Whether the add action is currently available
    pub fn can_add(&self) -> bool {
        self.state.read().runtime.add_enabled
    }

    /// Place the detected label at the ROI centre
    pub fn place_annotation<F: ArFrame + ?Sized>(&mut self, frame: &F) -> PlacementResult {
        self.place_annotation_at(frame, Instant::now())
    }

    /// Place the detected label at the ROI centre, with `now` as the failure time
    pub fn place_annotation_at<F: ArFrame + ?Sized>(
        &mut self,
        frame: &F,
        now: Instant,
    ) -> PlacementResult {
        let (label, point) = {
            let state = self.state.read();
            (
                state.detected_label().unwrap_or_default().to_string(),
                state.roi().center(),
            )
        };

        let result = self.placer.place(&label, point, frame);

        let mut state = self.state.write();
        match &result {
            Ok(annotation) => {
                state.annotations.add(annotation.clone());
            }
            Err(e) => {
                let expires_at =
                    self.banners.push_at(BannerKind::PlacementFailed, e.to_string(), now);
                state.runtime.set_error(e.to_string());
                state.runtime.disable_add_until(expires_at);
            }
        }
        result
    }

    /// Expire banners and re-enable the add action when due
    pub fn tick(&mut self, now: Instant) {
        self.banners.prune(now);
        if self.state.write().runtime.refresh_add(now) {
            debug!("add action re-enabled");
        }
    }

    pub fn banners(&self) -> &BannerQueue {
        &self.banners
    }

    /// Delete one annotation
    pub fn remove_annotation(&self, id: Uuid) -> Option<Annotation> {
        self.state.write().annotations.remove(id)
    }

    /// Delete every annotation
    pub fn reset_annotations(&self) -> usize {
        self.state.write().annotations.reset_all()
    }

    /// Check if the worker thread is running
    pub fn is_worker_running(&self) -> bool {
        self.worker_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for LexiconApp {
    fn drop(&mut self) {
        // Signal worker to stop; a full queue is drained before it sees this
        let _ = self.to_worker.send(WorkerRequest::Shutdown);

        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Worker loop: one recognition per request, results sent back in order
fn run_worker<R: Recognizer>(
    mut pipeline: RecognitionPipeline<R>,
    requests: Receiver<WorkerRequest>,
    events: Sender<WorkerEvent>,
) {
    for request in requests.iter() {
        match request {
            WorkerRequest::Recognize { frame, roi, screen } => {
                let outcome = pipeline.process(&frame, &roi, screen);
                let event = WorkerEvent::Recognized {
                    sequence: frame.sequence,
                    outcome,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            WorkerRequest::Shutdown => break,
        }
    }
    let _ = events.send(WorkerEvent::Stopped);
    info!("Recognition worker exiting");
}

//! Session state owned by the UI thread

use std::time::Instant;
use tracing::{debug, info};

use crate::ar::AnnotationStore;
use crate::config::AppConfig;
use crate::geometry::{clamp_rect, remap_rect, Point, Rect, Size};
use crate::overlay::{hit_test, BoundingBoxController, DragTrack, GestureEvent};
use crate::vision::{Recognition, RecognitionOutcome};

/// Everything the camera screen needs between frames
#[derive(Debug)]
pub struct SessionState {
    /// Application configuration
    pub config: AppConfig,
    /// Annotations placed in the scene
    pub annotations: AnnotationStore,
    /// Runtime flags (not persisted)
    pub runtime: RuntimeState,
    bounding_box: BoundingBoxController,
    container: Option<Size>,
    detected: Option<Recognition>,
}

impl SessionState {
    /// Create a session; the ROI is placed once the container is first measured
    pub fn new(config: AppConfig) -> Self {
        let policy = config.clamp_policy();
        Self {
            config,
            annotations: AnnotationStore::new(),
            runtime: RuntimeState::default(),
            bounding_box: BoundingBoxController::new(Rect::default(), policy),
            container: None,
            detected: None,
        }
    }

    /// Create a session with an explicit starting ROI.
    ///
    /// The ROI is clamped into `container` so it starts at rest; a degenerate
    /// container leaves it untouched until the first real measurement.
    pub fn with_roi(config: AppConfig, container: Size, roi: Rect) -> Self {
        let mut state = Self::new(config);
        let roi = if container.is_degenerate() {
            roi
        } else {
            state.container = Some(container);
            clamp_rect(roi, container, &state.config.clamp_policy())
        };
        state.bounding_box.set_rect(roi);
        state
    }

    /// Last measured, non-degenerate container size
    pub fn container(&self) -> Option<Size> {
        self.container
    }

    /// ROI as it should be drawn right now
    pub fn roi(&self) -> Rect {
        self.bounding_box.display_rect()
    }

    pub fn bounding_box(&self) -> &BoundingBoxController {
        &self.bounding_box
    }

    /// Record a container measurement.
    ///
    /// The first real measurement places the default centred ROI; every later
    /// change remaps the ROI exactly once. Repeats and degenerate sizes are
    /// ignored. Returns whether the ROI was touched.
    pub fn observe_container_size(&mut self, size: Size) -> bool {
        if size.is_degenerate() || self.container == Some(size) {
            return false;
        }

        let rect = match self.container {
            None => {
                let side = self.config.geometry.initial_box_size;
                let initial = Rect::centered_in(size, Size::square(side));
                clamp_rect(initial, size, &self.config.clamp_policy())
            }
            Some(previous) => {
                info!("Container changed {:?} -> {:?}", previous, size);
                remap_rect(self.bounding_box.rect(), previous, size, &self.config.resize_policy())
            }
        };

        self.bounding_box.set_rect(rect);
        self.container = Some(size);
        true
    }

    /// Pick the gesture track for a touch at `point`
    pub fn track_for_touch(&self, point: Point) -> Option<DragTrack> {
        hit_test(&self.roi(), point, self.config.geometry.handle_hit_radius)
    }

    /// Route one gesture event to the bounding box; returns the rect to draw
    pub fn on_gesture(&mut self, track: DragTrack, event: GestureEvent) -> Rect {
        let Some(container) = self.container else {
            debug!("gesture before first layout, ignoring");
            return self.roi();
        };
        self.bounding_box.handle_event(track, event, container)
    }

    /// Apply a recognition result; the newest result always wins
    pub fn apply_recognition(&mut self, outcome: RecognitionOutcome) {
        self.detected = match outcome {
            RecognitionOutcome::Detected(recognition) => Some(recognition),
            RecognitionOutcome::NothingDetected | RecognitionOutcome::Skipped => None,
        };
    }

    pub fn detected_label(&self) -> Option<&str> {
        self.detected.as_ref().map(|r| r.label.as_str())
    }
}

/// Runtime state that is not persisted
#[derive(Debug, Clone)]
pub struct RuntimeState {
    /// Whether the "add annotation" action is available
    pub add_enabled: bool,
    /// When a disabled add action comes back
    pub add_reenable_at: Option<Instant>,
    /// Last error message (if any)
    pub last_error: Option<String>,
    /// Frames handed to the recognition worker
    pub frames_submitted: u64,
    /// Frames dropped because the worker was busy
    pub frames_dropped: u64,
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self {
            add_enabled: true,
            add_reenable_at: None,
            last_error: None,
            frames_submitted: 0,
            frames_dropped: 0,
        }
    }
}

impl RuntimeState {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Disable the add action until `until`
    pub fn disable_add_until(&mut self, until: Instant) {
        self.add_enabled = false;
        self.add_reenable_at = Some(until);
    }

    /// Re-enable the add action once its deadline has passed
    pub fn refresh_add(&mut self, now: Instant) -> bool {
        match self.add_reenable_at {
            Some(at) if now >= at => {
                self.add_enabled = true;
                self.add_reenable_at = None;
                self.clear_error();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::HandlePosition;
    use std::time::Duration;

    #[test]
    fn test_first_measurement_places_centred_roi() {
        let mut state = SessionState::new(AppConfig::default());
        assert!(state.observe_container_size(Size::new(800.0, 1200.0)));
        assert_eq!(state.roi(), Rect::new(300.0, 500.0, 200.0, 200.0));
    }

    #[test]
    fn test_repeated_and_degenerate_sizes_ignored() {
        let mut state = SessionState::new(AppConfig::default());
        assert!(!state.observe_container_size(Size::new(0.0, 0.0)));
        assert!(state.container().is_none());

        state.observe_container_size(Size::new(400.0, 800.0));
        assert!(!state.observe_container_size(Size::new(400.0, 800.0)));
    }

    #[test]
    fn test_rotation_remaps_once() {
        let mut state = SessionState::new(AppConfig::default());
        state.observe_container_size(Size::new(400.0, 800.0));
        assert_eq!(state.roi(), Rect::new(100.0, 300.0, 200.0, 200.0));

        assert!(state.observe_container_size(Size::new(800.0, 400.0)));
        assert_eq!(state.roi(), Rect::new(200.0, 150.0, 400.0, 100.0));
        assert_eq!(state.container(), Some(Size::new(800.0, 400.0)));
    }

    #[test]
    fn test_starting_roi_is_clamped() {
        let container = Size::new(800.0, 1200.0);
        let roi = Rect::new(-50.0, 300.0, 40.0, 40.0);
        let state = SessionState::with_roi(AppConfig::default(), container, roi);
        assert_eq!(state.roi(), Rect::new(16.0, 300.0, 100.0, 100.0));
        assert_eq!(state.container(), Some(container));
    }

    #[test]
    fn test_corner_drag_from_clamped_start_keeps_left_edge() {
        let container = Size::new(800.0, 1200.0);
        let roi = Rect::new(-50.0, 300.0, 40.0, 40.0);
        let mut state = SessionState::with_roi(AppConfig::default(), container, roi);
        let track = DragTrack::Handle(HandlePosition::BottomRight);

        state.on_gesture(track, GestureEvent::began());
        state.on_gesture(track, GestureEvent::changed(0.0, 0.0));
        state.on_gesture(track, GestureEvent::ended(0.0, 0.0));

        let roi = state.roi();
        assert_eq!(roi.x, 16.0);
        assert_eq!(roi.y, 300.0);
        assert!(roi.width >= 100.0 && roi.height >= 100.0);
    }

    #[test]
    fn test_degenerate_container_keeps_starting_roi() {
        let roi = Rect::new(-50.0, 300.0, 40.0, 40.0);
        let state = SessionState::with_roi(AppConfig::default(), Size::new(0.0, 0.0), roi);
        assert_eq!(state.roi(), roi);
        assert!(state.container().is_none());
    }

    #[test]
    fn test_gesture_before_layout_is_ignored() {
        let mut state = SessionState::new(AppConfig::default());
        let rect = state.on_gesture(DragTrack::Box, GestureEvent::began());
        assert_eq!(rect, Rect::default());
        assert!(!state.bounding_box().is_dragging());
    }

    #[test]
    fn test_touch_and_drag_handle() {
        let mut state = SessionState::new(AppConfig::default());
        state.observe_container_size(Size::new(800.0, 1200.0));

        let track = state.track_for_touch(Point::new(502.0, 698.0)).unwrap();
        assert_eq!(track, DragTrack::Handle(HandlePosition::BottomRight));

        state.on_gesture(track, GestureEvent::began());
        state.on_gesture(track, GestureEvent::changed(-150.0, -150.0));
        state.on_gesture(track, GestureEvent::ended(-150.0, -150.0));
        assert_eq!(state.roi(), Rect::new(300.0, 500.0, 100.0, 100.0));
    }

    #[test]
    fn test_last_recognition_wins() {
        let mut state = SessionState::new(AppConfig::default());
        state.apply_recognition(RecognitionOutcome::Detected(Recognition {
            label: "cup".into(),
            confidence: 0.8,
        }));
        assert_eq!(state.detected_label(), Some("cup"));

        state.apply_recognition(RecognitionOutcome::Skipped);
        assert_eq!(state.detected_label(), None);
    }

    #[test]
    fn test_add_reenabled_after_deadline() {
        let mut runtime = RuntimeState::default();
        let now = Instant::now();
        runtime.set_error("No surface");
        runtime.disable_add_until(now + Duration::from_secs(4));

        assert!(!runtime.refresh_add(now + Duration::from_secs(3)));
        assert!(!runtime.add_enabled);
        assert!(runtime.refresh_add(now + Duration::from_secs(4)));
        assert!(runtime.add_enabled);
        assert!(runtime.last_error.is_none());
    }
}

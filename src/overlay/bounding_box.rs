//! Interactive ROI bounding box
//!
//! Two gesture tracks share one [`DragSession`] slot:
//! - whole-box drags buffer a clamped offset and only commit on gesture end,
//!   so the box floats smoothly while the margins are re-evaluated every tick
//! - corner-handle drags write straight into the live rect
//!
//! Both tracks compute every update against the rect captured when the
//! gesture began, never against the previous tick.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::{
    clamp_high_wins, clamp_low_wins, clamp_rect, ClampPolicy, Point, Rect, Size, Translation,
};

/// Corner handle of the bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; 4] = [
        HandlePosition::TopLeft,
        HandlePosition::TopRight,
        HandlePosition::BottomLeft,
        HandlePosition::BottomRight,
    ];

    /// Whether dragging this handle moves the left edge (else the right one)
    pub fn moves_left_edge(self) -> bool {
        matches!(self, HandlePosition::TopLeft | HandlePosition::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge (else the bottom one)
    pub fn moves_top_edge(self) -> bool {
        matches!(self, HandlePosition::TopLeft | HandlePosition::TopRight)
    }

    /// Screen position of this corner on `rect`
    pub fn corner_of(self, rect: &Rect) -> Point {
        let x = if self.moves_left_edge() { rect.x } else { rect.max_x() };
        let y = if self.moves_top_edge() { rect.y } else { rect.max_y() };
        Point::new(x, y)
    }
}

/// Which gesture track a drag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragTrack {
    /// Moving the whole box
    Box,
    /// Resizing from one corner
    Handle(HandlePosition),
}

/// Gesture lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    /// Treated exactly like `Ended`
    Cancelled,
}

/// One event from a gesture recognizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    /// Cumulative translation since the gesture began
    pub translation: Translation,
}

impl GestureEvent {
    pub fn began() -> Self {
        Self {
            phase: GesturePhase::Began,
            translation: Translation::ZERO,
        }
    }

    pub fn changed(dx: f32, dy: f32) -> Self {
        Self {
            phase: GesturePhase::Changed,
            translation: Translation::new(dx, dy),
        }
    }

    pub fn ended(dx: f32, dy: f32) -> Self {
        Self {
            phase: GesturePhase::Ended,
            translation: Translation::new(dx, dy),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            phase: GesturePhase::Cancelled,
            translation: Translation::ZERO,
        }
    }
}

/// State of the gesture currently in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub track: DragTrack,
    /// Rect at gesture start
    pub initial_rect: Rect,
    /// Last translation applied (clamped for box drags, raw for handles)
    pub translation: Translation,
}

/// Drag/resize state machine for the ROI
#[derive(Debug, Clone)]
pub struct BoundingBoxController {
    rect: Rect,
    policy: ClampPolicy,
    session: Option<DragSession>,
}

impl BoundingBoxController {
    pub fn new(rect: Rect, policy: ClampPolicy) -> Self {
        Self {
            rect,
            policy,
            session: None,
        }
    }

    /// Backing rect. Live during handle drags, last committed value during box drags.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rect to draw this frame, including a box drag's buffered offset
    pub fn display_rect(&self) -> Rect {
        match self.session {
            Some(DragSession {
                track: DragTrack::Box,
                initial_rect,
                translation,
            }) => initial_rect.offset_by(translation),
            _ => self.rect,
        }
    }

    pub fn policy(&self) -> &ClampPolicy {
        &self.policy
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Replace the rect from outside, e.g. after a container remap.
    ///
    /// Any gesture in progress is dropped without committing.
    pub fn set_rect(&mut self, rect: Rect) {
        if let Some(session) = self.session.take() {
            debug!(track = ?session.track, "dropping drag session on external rect change");
        }
        self.rect = rect;
    }

    /// Feed one gesture event for `track` and return the rect to display.
    ///
    /// Events for a track other than the active one are ignored.
    pub fn handle_event(&mut self, track: DragTrack, event: GestureEvent, container: Size) -> Rect {
        match event.phase {
            GesturePhase::Began => {
                self.begin(track);
            }
            GesturePhase::Changed => {
                if self.is_active(track) {
                    self.update(event.translation, container);
                }
            }
            GesturePhase::Ended => {
                if self.is_active(track) {
                    self.finish(event.translation, container);
                }
            }
            GesturePhase::Cancelled => {
                if self.is_active(track) {
                    self.cancel(container);
                }
            }
        }
        self.display_rect()
    }

    fn is_active(&self, track: DragTrack) -> bool {
        self.session.map(|s| s.track == track).unwrap_or(false)
    }

    /// Start a gesture. Returns false if another gesture is already active.
    pub fn begin(&mut self, track: DragTrack) -> bool {
        if let Some(active) = &self.session {
            debug!(active = ?active.track, requested = ?track, "ignoring second gesture");
            return false;
        }
        self.session = Some(DragSession {
            track,
            initial_rect: self.rect,
            translation: Translation::ZERO,
        });
        trace!(?track, rect = ?self.rect, "gesture began");
        true
    }

    /// Apply an intermediate cumulative translation
    pub fn update(&mut self, translation: Translation, container: Size) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if container.is_degenerate() {
            return;
        }

        match session.track {
            DragTrack::Box => {
                session.translation = clamp_box_translation(
                    &session.initial_rect,
                    translation,
                    container,
                    self.policy.margin,
                );
            }
            DragTrack::Handle(handle) => {
                session.translation = translation;
                self.rect = resize_from_corner(
                    &session.initial_rect,
                    handle,
                    translation,
                    container,
                    &self.policy,
                );
            }
        }
    }

    /// End the gesture with its final translation and commit the rect
    pub fn finish(&mut self, translation: Translation, container: Size) -> Rect {
        let Some(session) = self.session.take() else {
            return self.rect;
        };
        if container.is_degenerate() {
            return self.rect;
        }

        let proposed = match session.track {
            DragTrack::Box => {
                let clamped = clamp_box_translation(
                    &session.initial_rect,
                    translation,
                    container,
                    self.policy.margin,
                );
                session.initial_rect.offset_by(clamped)
            }
            DragTrack::Handle(handle) => resize_from_corner(
                &session.initial_rect,
                handle,
                translation,
                container,
                &self.policy,
            ),
        };

        self.rect = clamp_rect(proposed, container, &self.policy);
        debug!(track = ?session.track, rect = ?self.rect, "gesture committed");
        self.rect
    }

    /// Cancel the gesture, committing the last observed translation
    pub fn cancel(&mut self, container: Size) -> Rect {
        match self.session {
            Some(session) => self.finish(session.translation, container),
            None => self.rect,
        }
    }
}

/// Clamp a whole-box translation so `initial` stays inside the margins.
///
/// The left/top margin wins when the box is wider than the free space.
pub fn clamp_box_translation(
    initial: &Rect,
    translation: Translation,
    container: Size,
    margin: f32,
) -> Translation {
    let dx = clamp_low_wins(
        translation.dx,
        margin - initial.x,
        container.width - margin - initial.max_x(),
    );
    let dy = clamp_low_wins(
        translation.dy,
        margin - initial.y,
        container.height - margin - initial.max_y(),
    );
    Translation::new(dx, dy)
}

/// Resize `initial` by dragging `handle` by `translation`.
///
/// Only the two edges adjacent to the handle move. Each moving edge is held
/// back by the minimum size and by the margin, with the margin winning.
pub fn resize_from_corner(
    initial: &Rect,
    handle: HandlePosition,
    translation: Translation,
    container: Size,
    policy: &ClampPolicy,
) -> Rect {
    let margin = policy.margin;
    let min = policy.min_size;
    let mut rect = *initial;

    if handle.moves_left_edge() {
        let dx = clamp_low_wins(translation.dx, margin - initial.x, initial.width - min.width);
        let right = initial.max_x();
        rect.x = initial.x + dx;
        rect.width = right - rect.x;
    } else {
        let dx = clamp_high_wins(
            translation.dx,
            min.width - initial.width,
            container.width - margin - initial.max_x(),
        );
        rect.width = initial.width + dx;
    }

    if handle.moves_top_edge() {
        let dy = clamp_low_wins(translation.dy, margin - initial.y, initial.height - min.height);
        let bottom = initial.max_y();
        rect.y = initial.y + dy;
        rect.height = bottom - rect.y;
    } else {
        let dy = clamp_high_wins(
            translation.dy,
            min.height - initial.height,
            container.height - margin - initial.max_y(),
        );
        rect.height = initial.height + dy;
    }

    rect
}

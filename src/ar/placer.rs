//! Placing label annotations where the ROI centre meets a surface

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{Annotation, ArFrame, PlaneAlignment, RaycastTarget};
use crate::geometry::Point;

/// Why a placement attempt produced no annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no surface detected, move the device slowly to scan the area")]
    NoSurfaceDetected,
    #[error("nothing detected to label")]
    NoLabel,
    #[error("a placement is already in progress")]
    AlreadyInProgress,
}

pub type PlacementResult = Result<Annotation, PlacementError>;

/// Turns a label and a screen point into a world-anchored [`Annotation`].
///
/// At most one placement runs at a time; a concurrent request is rejected,
/// never queued. Failures are never retried here.
#[derive(Debug)]
pub struct AnnotationPlacer {
    in_flight: AtomicBool,
    scale: f32,
}

impl AnnotationPlacer {
    /// `scale` is the user's annotation size preference, applied to every placement
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            warn!("ignoring invalid annotation scale {}, using 1.0", scale);
            1.0
        };
        Self {
            in_flight: AtomicBool::new(false),
            scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether a placement is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Raycast from `screen_point` and anchor `label` at the first hit
    pub fn place<F: ArFrame + ?Sized>(
        &self,
        label: &str,
        screen_point: Point,
        frame: &F,
    ) -> PlacementResult {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("placement rejected, another one is in flight");
            return Err(PlacementError::AlreadyInProgress);
        };

        let label = label.trim();
        if label.is_empty() {
            return Err(PlacementError::NoLabel);
        }

        let query = frame
            .make_query(screen_point, RaycastTarget::EstimatedPlane, PlaneAlignment::Any)
            .ok_or(PlacementError::NoSurfaceDetected)?;

        let Some(hit) = frame.raycast(&query).into_iter().next() else {
            warn!("No surface under {:?} for '{}'", screen_point, label);
            return Err(PlacementError::NoSurfaceDetected);
        };

        let annotation = Annotation::new(label, hit.world_transform, self.scale);
        info!(
            "Placed '{}' at ({:.3}, {:.3}, {:.3})",
            annotation.original_text,
            annotation.world_position.x,
            annotation.world_position.y,
            annotation.world_position.z
        );
        Ok(annotation)
    }
}

impl Default for AnnotationPlacer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Holds the in-flight flag for the duration of one placement
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

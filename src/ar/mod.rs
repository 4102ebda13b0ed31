//! AR Scene Layer
//!
//! Raycasting against the session's understanding of real-world surfaces and
//! anchoring label annotations at the resulting world transforms. The AR
//! session itself is an external collaborator behind [`ArFrame`].

pub mod annotation;
pub mod placer;

pub use annotation::{Annotation, AnnotationStore};
pub use placer::{AnnotationPlacer, PlacementError, PlacementResult};

use glam::Mat4;

use crate::geometry::Point;

/// Column-major 4x4 world transform
pub type WorldTransform = Mat4;

/// Kind of surface a raycast may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaycastTarget {
    /// Surfaces the session estimates but has not yet anchored
    EstimatedPlane,
    /// Detected planes, limited to their measured extent
    ExistingPlaneGeometry,
    /// Detected planes, treated as infinite
    ExistingPlaneInfinite,
}

/// Orientation filter for raycast targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneAlignment {
    Any,
    Horizontal,
    Vertical,
}

/// A raycast from a screen point into the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    pub origin: Point,
    pub target: RaycastTarget,
    pub alignment: PlaneAlignment,
}

/// One raycast intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub world_transform: WorldTransform,
}

/// The current AR frame, as far as placement is concerned
pub trait ArFrame {
    /// Build a query for `origin`; `None` when the session cannot raycast from there.
    fn make_query(
        &self,
        origin: Point,
        target: RaycastTarget,
        alignment: PlaneAlignment,
    ) -> Option<RaycastQuery> {
        Some(RaycastQuery {
            origin,
            target,
            alignment,
        })
    }

    /// Intersections ordered nearest first
    fn raycast(&self, query: &RaycastQuery) -> Vec<RaycastHit>;
}

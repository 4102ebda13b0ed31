//! World-anchored label annotations

use glam::{Mat4, Quat, Vec3};
use tracing::debug;
use uuid::Uuid;

use super::WorldTransform;

/// A label anchored in the AR scene
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: Uuid,
    /// Detected text shown on the label
    pub original_text: String,
    /// Transform of the raycast hit the label is anchored to
    pub world_transform: WorldTransform,
    /// Translation part of `world_transform`
    pub world_position: Vec3,
    /// Uniform display scale
    pub scale: f32,
}

impl Annotation {
    pub fn new(text: impl Into<String>, world_transform: WorldTransform, scale: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_text: text.into(),
            world_transform,
            world_position: world_transform.w_axis.truncate(),
            scale,
        }
    }

    /// Billboard transform turning the label's +Z towards `camera_position`.
    ///
    /// Rotation is about world Y only so text stays upright. The renderer
    /// calls this every frame; nothing here is cached.
    pub fn facing(&self, camera_position: Vec3) -> Mat4 {
        let to_camera = camera_position - self.world_position;
        let yaw = if to_camera.x.abs() < f32::EPSILON && to_camera.z.abs() < f32::EPSILON {
            0.0
        } else {
            to_camera.x.atan2(to_camera.z)
        };

        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(yaw),
            self.world_position,
        )
    }
}

/// The scene's annotation collection.
///
/// Single writer: only the UI thread adds or removes annotations.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation, returning its id
    pub fn add(&mut self, annotation: Annotation) -> Uuid {
        let id = annotation.id;
        self.annotations.push(annotation);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Remove a single annotation by id
    pub fn remove(&mut self, id: Uuid) -> Option<Annotation> {
        let pos = self.annotations.iter().position(|a| a.id == id)?;
        Some(self.annotations.remove(pos))
    }

    /// Remove every annotation, returning how many there were
    pub fn reset_all(&mut self) -> usize {
        let count = self.annotations.len();
        self.annotations.clear();
        debug!("cleared {} annotations", count);
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(text: &str, position: Vec3) -> Annotation {
        Annotation::new(text, Mat4::from_translation(position), 1.0)
    }

    #[test]
    fn test_position_extracted_from_transform() {
        let transform =
            Mat4::from_rotation_translation(Quat::from_rotation_x(0.3), Vec3::new(1.0, 2.0, 3.0));
        let a = Annotation::new("chair", transform, 1.0);
        assert_eq!(a.world_position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_facing_turns_towards_camera() {
        let a = annotation("lamp", Vec3::ZERO);
        let m = a.facing(Vec3::new(2.0, 1.5, 0.0));
        let forward = m.transform_vector3(Vec3::Z);
        assert!((forward - Vec3::X).length() < 1e-5, "{forward:?}");
        assert!((m.w_axis.truncate() - Vec3::ZERO).length() < 1e-6);
    }

    #[test]
    fn test_facing_applies_scale() {
        let mut a = annotation("lamp", Vec3::new(0.0, 0.0, -1.0));
        a.scale = 2.0;
        let m = a.facing(Vec3::ZERO);
        assert!((m.transform_vector3(Vec3::Z).length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_camera_straight_above_keeps_identity_yaw() {
        let a = annotation("rug", Vec3::ZERO);
        let m = a.facing(Vec3::new(0.0, 3.0, 0.0));
        assert!((m.transform_vector3(Vec3::Z) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_store_add_remove_reset() {
        let mut store = AnnotationStore::new();
        let a = store.add(annotation("cup", Vec3::ZERO));
        let b = store.add(annotation("plate", Vec3::ONE));
        assert_eq!(store.len(), 2);

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.original_text, "cup");
        assert!(store.get(a).is_none());
        assert!(store.remove(a).is_none());
        assert_eq!(store.get(b).map(|x| x.original_text.as_str()), Some("plate"));

        store.add(annotation("fork", Vec3::ZERO));
        assert_eq!(store.reset_all(), 2);
        assert!(store.is_empty());
    }
}

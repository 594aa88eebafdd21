use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::SceneEntity;
use crate::geometry::BBox;

/// An ordered collection of drawable entities. Insertion order is draw
/// order; entities are never mutated once added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: Uuid,
    pub name: String,
    entities: Vec<SceneEntity>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            entities: Vec::new(),
        }
    }

    /// Append an entity; returns its draw-order index.
    pub fn add(&mut self, entity: SceneEntity) -> usize {
        log::debug!("scene '{}': add {} #{}", self.name, entity.kind(), self.entities.len());
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&SceneEntity> {
        self.entities.get(index)
    }

    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Union bounding box of everything in the scene.
    pub fn bbox(&self) -> Option<BBox> {
        let mut boxes = self.entities.iter().map(|e| e.bbox());
        let first = boxes.next()?;
        Some(boxes.fold(first, |acc, bb| acc.union(&bb)))
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Color, LineSegment, MarkerDot};
    use crate::geometry::Vec2;

    #[test]
    fn test_scene_preserves_draw_order() {
        let mut scene = Scene::new("show");
        let a = scene.add(SceneEntity::Line(LineSegment::new(
            Vec2::new(1.0, 4.0),
            Vec2::new(1.0, -4.0),
        )));
        let b = scene.add(SceneEntity::Dot(MarkerDot::new(
            Vec2::ZERO,
            Color::HIGHLIGHT_RED,
        )));
        assert_eq!((a, b), (0, 1));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(0).unwrap().kind(), "line");
        assert_eq!(scene.get(1).unwrap().kind(), "dot");
    }

    #[test]
    fn test_scene_bbox_union() {
        let mut scene = Scene::new("show");
        assert!(scene.bbox().is_none());
        scene.add(SceneEntity::Line(LineSegment::new(
            Vec2::new(-7.0, 0.0),
            Vec2::new(1.0, 0.0),
        )));
        scene.add(SceneEntity::Dot(MarkerDot::new(
            Vec2::new(3.0, 3.0),
            Color::HIGHLIGHT_RED,
        )));
        let bb = scene.bbox().unwrap();
        assert!(bb.min.x <= -7.0);
        assert!(bb.max.x >= 3.0);
        assert!(bb.max.y >= 3.0);
    }

    #[test]
    fn test_scene_json_round_trip() {
        let mut scene = Scene::new("show");
        scene.add(SceneEntity::Dot(MarkerDot::new(
            Vec2::new(1.5, -2.5),
            Color::HIGHLIGHT_RED,
        )));
        let json = scene.to_json().unwrap();
        let back = Scene::from_json(&json).unwrap();
        assert_eq!(back.id, scene.id);
        assert_eq!(back.len(), 1);
        assert_eq!(back.get(0), scene.get(0));
    }
}

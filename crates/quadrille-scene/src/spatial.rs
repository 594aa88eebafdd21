use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Vec2};
use crate::scene::Scene;

/// An entry in the R-tree spatial index, referencing a scene entity by its
/// draw-order index.
#[derive(Debug, Clone)]
pub struct EntityEntry {
    /// Index into the scene's entity list.
    pub entity_index: usize,
    /// Bounding box of the entity.
    pub bbox: BBox,
}

impl RTreeObject for EntityEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

// Point queries (`locate_all_at_point`) need a distance metric; the
// envelope's own squared distance is exact for an axis-aligned box entry.
impl PointDistance for EntityEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope().distance_2(point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bbox.contains_point(&Vec2::new(point[0], point[1]))
    }
}

/// Spatial index over scene entities for point queries and region culling.
pub struct SceneIndex {
    tree: RTree<EntityEntry>,
}

impl SceneIndex {
    /// Build the index from every entity in the scene.
    pub fn build(scene: &Scene) -> Self {
        let entries = scene
            .entities()
            .iter()
            .enumerate()
            .map(|(entity_index, entity)| EntityEntry {
                entity_index,
                bbox: entity.bbox(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Find all entries whose bounding box contains the given point.
    pub fn query_point(&self, point: &Vec2) -> Vec<&EntityEntry> {
        self.tree.locate_all_at_point(&[point.x, point.y]).collect()
    }

    /// Find all entries intersecting the given region, e.g. the visible
    /// canvas bounds.
    pub fn query_region(&self, region: &BBox) -> Vec<&EntityEntry> {
        let envelope = AABB::from_corners(
            [region.min.x, region.min.y],
            [region.max.x, region.max.y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Color, LineSegment, MarkerDot, SceneEntity};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new("show");
        scene.add(SceneEntity::Line(LineSegment::new(
            Vec2::new(1.0, 4.0),
            Vec2::new(1.0, -4.0),
        )));
        scene.add(SceneEntity::Dot(MarkerDot::new(
            Vec2::new(20.0, 20.0),
            Color::HIGHLIGHT_RED,
        )));
        scene
    }

    #[test]
    fn test_point_query() {
        let scene = sample_scene();
        let index = SceneIndex::build(&scene);
        assert_eq!(index.len(), 2);

        let hits = index.query_point(&Vec2::new(1.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity_index, 0);

        let hits = index.query_point(&Vec2::new(20.0, 20.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity_index, 1);
    }

    #[test]
    fn test_point_query_between_entities_is_empty() {
        let scene = sample_scene();
        let index = SceneIndex::build(&scene);
        assert!(index.query_point(&Vec2::new(10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_region_query_culls_far_entities() {
        let scene = sample_scene();
        let index = SceneIndex::build(&scene);
        // a 14x8 canvas centered at the origin sees the line but not the dot
        let canvas = BBox::centered(Vec2::ZERO, 14.0, 8.0);
        let hits = index.query_region(&canvas);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity_index, 0);
    }
}

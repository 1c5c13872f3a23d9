//! The spatial query seam used by the movement controller.
//!
//! The controller never talks to a concrete world. It asks two questions,
//! "does this sphere touch anything?" and "how far up is the ceiling?", through
//! [`SpatialQuery`], so hosts can answer them with their own physics scene.

use glam::Vec3;

use super::world::{CollisionWorld, QueryFilter};

/// Scene queries the movement controller depends on.
pub trait SpatialQuery {
    /// Whether a sphere at `point` overlaps any geometry accepted by `filter`.
    fn overlap_sphere(&self, point: Vec3, radius: f32, filter: QueryFilter) -> bool;

    /// Distance to the first hit along `direction`, if within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: QueryFilter) -> Option<f32>;
}

impl SpatialQuery for CollisionWorld {
    fn overlap_sphere(&self, point: Vec3, radius: f32, filter: QueryFilter) -> bool {
        CollisionWorld::overlap_sphere(self, point, radius, filter)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: QueryFilter) -> Option<f32> {
        let trace = CollisionWorld::raycast(self, origin, direction, max_distance, filter);
        trace
            .hit_something()
            .then(|| trace.fraction * max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ContentFlags;

    #[test]
    fn test_world_answers_ceiling_distance() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, 2.5, 0.0), Vec3::new(5.0, 0.5, 5.0), ContentFlags::SOLID);
        let query: &dyn SpatialQuery = &world;

        let distance = query
            .raycast(Vec3::ZERO, Vec3::Y, 10.0, QueryFilter::default())
            .expect("ceiling should be hit");
        assert!((distance - 2.0).abs() < 0.001);

        assert!(query.raycast(Vec3::ZERO, Vec3::Y, 1.5, QueryFilter::default()).is_none());
    }
}

//! Level loading and management.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use stride_physics::{CapsuleShape, CollisionWorld, ContentFlags, QueryFilter};

/// A game level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points, in the order players take them.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A spawn point for players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in degrees, 0 faces +Z).
    pub facing: f32,
}

impl SpawnPoint {
    pub fn new(position: Vec3, facing: f32) -> Self {
        Self { position, facing }
    }

    /// Body orientation for this spawn's facing.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.facing.to_radians())
    }
}

impl Level {
    /// Underside of the crawlspace roof in [`Level::test_arena`].
    pub const CRAWLSPACE_CEILING: f32 = 1.4;

    /// Top of the ledge in [`Level::test_arena`].
    pub const LEDGE_TOP: f32 = 1.0;

    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Create a simple test level for development.
    ///
    /// Layout:
    /// - floor with its top at y=0, walled in at ±30
    /// - a crawlspace roof spanning x ∈ [-2, 2], z ∈ [0, 4], underside at
    ///   [`Self::CRAWLSPACE_CEILING`]
    /// - a ledge spanning x ∈ [6, 10], z ∈ [-12, -8], top at [`Self::LEDGE_TOP`]
    /// - a wedge ramp spanning x ∈ [-12, -8], z ∈ [-12, -8], rising toward +Z
    ///   up to [`Self::LEDGE_TOP`]
    ///
    /// Spawn 0 stands at (0, 0, -6) facing the crawlspace. Spawn 1 stands on
    /// the ledge facing its +X edge.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");

        // Floor
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(30.0, 0.5, 30.0),
            ContentFlags::SOLID | ContentFlags::GROUND,
        );

        // Walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        let arena_size = 30.0;

        // North wall
        level.collision.add_box(
            Vec3::new(0.0, wall_height / 2.0, -arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ContentFlags::SOLID,
        );

        // South wall
        level.collision.add_box(
            Vec3::new(0.0, wall_height / 2.0, arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ContentFlags::SOLID,
        );

        // East wall
        level.collision.add_box(
            Vec3::new(arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ContentFlags::SOLID,
        );

        // West wall
        level.collision.add_box(
            Vec3::new(-arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ContentFlags::SOLID,
        );

        // Crawlspace roof, too low to walk under standing
        let roof_thickness = 0.25;
        level.collision.add_box(
            Vec3::new(0.0, Self::CRAWLSPACE_CEILING + roof_thickness, 2.0),
            Vec3::new(2.0, roof_thickness, 2.0),
            ContentFlags::SOLID,
        );

        // Ledge
        level.collision.add_box(
            Vec3::new(8.0, Self::LEDGE_TOP / 2.0, -10.0),
            Vec3::new(2.0, Self::LEDGE_TOP / 2.0, 2.0),
            ContentFlags::SOLID | ContentFlags::GROUND,
        );

        // Ramp
        let ramp = [
            Vec3::new(-12.0, 0.0, -12.0),
            Vec3::new(-8.0, 0.0, -12.0),
            Vec3::new(-12.0, 0.0, -8.0),
            Vec3::new(-8.0, 0.0, -8.0),
            Vec3::new(-12.0, Self::LEDGE_TOP, -8.0),
            Vec3::new(-8.0, Self::LEDGE_TOP, -8.0),
        ];
        if level
            .collision
            .add_convex_hull(&ramp, ContentFlags::SOLID | ContentFlags::GROUND)
            .is_none()
        {
            log::warn!("test arena ramp hull could not be built");
        }

        // Spawn points
        level.spawn_points.push(SpawnPoint::new(Vec3::new(0.0, 0.0, -6.0), 0.0));
        level
            .spawn_points
            .push(SpawnPoint::new(Vec3::new(8.0, Self::LEDGE_TOP, -10.0), 90.0));

        level
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }

    /// Find where a capsule placed near `position` comes to rest.
    ///
    /// Traces down from slightly above the point. Returns `None` if there is
    /// no ground within reach.
    pub fn drop_to_ground(&self, position: Vec3, capsule: &CapsuleShape) -> Option<Vec3> {
        // Start slightly above the spawn point to trace down
        let trace_start = position + Vec3::new(0.0, 1.0, 0.0);
        let trace_end = position - Vec3::new(0.0, 2.0, 0.0);

        let trace = self
            .collision
            .trace(trace_start, trace_end, capsule.trace_shape(), QueryFilter::default());

        trace.hit_something().then_some(trace.end_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_creation() {
        let level = Level::new("test", "Test Level");
        assert_eq!(level.id, "test");
        assert_eq!(level.collision.brush_count(), 0);
    }

    #[test]
    fn test_test_arena() {
        let level = Level::test_arena();
        assert_eq!(level.collision.brush_count(), 8);
        assert!(level.player_spawn_count() >= 2);
    }

    #[test]
    fn test_crawlspace_roof_height() {
        let level = Level::test_arena();
        let hit = level
            .collision
            .raycast(Vec3::new(0.0, 0.1, 2.0), Vec3::Y, 5.0, QueryFilter::default());

        assert!(hit.hit_something());
        assert!((hit.end_position.y - Level::CRAWLSPACE_CEILING).abs() < 1e-3);
    }

    #[test]
    fn test_ramp_slopes_up_toward_ledge_height() {
        let level = Level::test_arena();
        let down = |z: f32| {
            level
                .collision
                .raycast(Vec3::new(-10.0, 3.0, z), Vec3::NEG_Y, 5.0, QueryFilter::default())
        };

        let middle = down(-10.0);
        assert!(middle.hit_something());
        assert!((middle.end_position.y - 0.5).abs() < 1e-3, "y = {}", middle.end_position.y);

        let high = down(-8.5);
        assert!((high.end_position.y - 0.875).abs() < 1e-3, "y = {}", high.end_position.y);
    }

    #[test]
    fn test_drop_to_ground() {
        let level = Level::test_arena();
        let capsule = CapsuleShape::standing(0.4, 1.8);

        let floor = level.drop_to_ground(Vec3::new(0.0, 0.0, -6.0), &capsule).unwrap();
        assert!(floor.y >= 0.0 && floor.y < 0.01, "y = {}", floor.y);

        let ledge = level.drop_to_ground(Vec3::new(8.0, 1.0, -10.0), &capsule).unwrap();
        assert!((ledge.y - Level::LEDGE_TOP).abs() < 0.01, "y = {}", ledge.y);

        assert!(level.drop_to_ground(Vec3::new(0.0, 20.0, 0.0), &capsule).is_none());
    }

    #[test]
    fn test_spawn_facing() {
        let level = Level::test_arena();
        let ledge = level.get_player_spawn(1).unwrap();
        let forward = ledge.orientation() * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }
}

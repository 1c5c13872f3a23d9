//! Scripted collaborators shared by the movement tests.

use glam::{Quat, Vec3};

use crate::collision::{QueryFilter, SpatialQuery};

use super::body::{CapsuleShape, Mover};
use super::slide_move::MoveOutcome;

/// Infinite floor plane with an optional flat ceiling above it.
#[derive(Debug, Clone, Copy)]
pub struct StubScene {
    pub floor_y: Option<f32>,
    pub ceiling_y: Option<f32>,
}

impl StubScene {
    pub fn floor() -> Self {
        Self {
            floor_y: Some(0.0),
            ceiling_y: None,
        }
    }

    pub fn with_ceiling(ceiling_y: f32) -> Self {
        Self {
            floor_y: Some(0.0),
            ceiling_y: Some(ceiling_y),
        }
    }

    pub fn void() -> Self {
        Self {
            floor_y: None,
            ceiling_y: None,
        }
    }
}

impl SpatialQuery for StubScene {
    fn overlap_sphere(&self, point: Vec3, radius: f32, _filter: QueryFilter) -> bool {
        self.floor_y.is_some_and(|floor| point.y - radius <= floor)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, _filter: QueryFilter) -> Option<f32> {
        if direction.y <= 0.0 {
            return None;
        }
        let distance = (self.ceiling_y? - origin.y) / direction.y;
        (0.0..=max_distance).contains(&distance).then_some(distance)
    }
}

/// Mover that integrates displacements and stops at the floor.
#[derive(Debug, Clone)]
pub struct StubMover {
    pub position: Vec3,
    pub orientation: Quat,
    pub capsule: CapsuleShape,
    pub floor_y: Option<f32>,
    pub moves: Vec<Vec3>,
    pub last_speed: f32,
}

impl StubMover {
    pub fn standing() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            capsule: CapsuleShape::standing(0.5, 2.0),
            floor_y: Some(0.0),
            moves: Vec::new(),
            last_speed: 0.0,
        }
    }
}

impl Mover for StubMover {
    fn move_by(&mut self, displacement: Vec3) -> MoveOutcome {
        self.moves.push(displacement);
        let mut outcome = MoveOutcome::default();
        let mut next = self.position + displacement;
        if let Some(floor) = self.floor_y {
            if next.y < floor {
                next.y = floor;
                outcome.set(MoveOutcome::BELOW);
            }
        }
        self.last_speed = (next - self.position).length();
        self.position = next;
        outcome
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    fn capsule(&self) -> CapsuleShape {
        self.capsule
    }

    fn set_height(&mut self, height: f32) {
        self.capsule.height = height;
    }

    fn set_center(&mut self, center: Vec3) {
        self.capsule.center = center;
    }

    fn velocity_magnitude(&self) -> f32 {
        self.last_speed
    }
}

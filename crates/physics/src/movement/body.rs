//! The mover seam and the reference capsule body.
//!
//! The controller commits one displacement per frame through the [`Mover`]
//! trait and resizes the capsule through it while crouching. [`BodyMover`]
//! is the reference implementation: it borrows a [`CharacterBody`] and the
//! [`CollisionWorld`] for one frame and resolves moves with collide-and-slide.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{BrushId, CollisionWorld, ContentFlags, QueryFilter, TraceShape};

use super::slide_move::{slide_move, MoveOutcome};

/// Capsule collider geometry, relative to the body position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    /// Radius of the cylinder and end caps.
    pub radius: f32,
    /// Total height including both caps.
    pub height: f32,
    /// Offset from the body position to the capsule center.
    pub center: Vec3,
}

impl CapsuleShape {
    /// A capsule standing on the body position.
    pub fn standing(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            center: Vec3::new(0.0, height * 0.5, 0.0),
        }
    }

    /// Bottom-center of the capsule for a body at `position`.
    #[inline]
    pub fn base(&self, position: Vec3) -> Vec3 {
        position + self.center - Vec3::Y * (self.height * 0.5)
    }

    /// Center of the lower cap's sphere for a body at `position`.
    #[inline]
    pub fn bottom_sphere_center(&self, position: Vec3) -> Vec3 {
        position + self.center - Vec3::Y * (self.height * 0.5 - self.radius)
    }

    /// The capsule as a shape for world traces.
    #[inline]
    pub fn trace_shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.radius,
            height: self.height,
        }
    }

    /// A capsule must be at least as tall as its two caps.
    pub fn is_valid(&self) -> bool {
        self.radius > 0.0 && self.height >= self.radius * 2.0
    }
}

/// The collider the controller drives.
///
/// Implementations own the body's transform and resolve collisions. The
/// controller only borrows a mover for the duration of one call.
pub trait Mover {
    /// Apply a world-space translation for this frame, resolving collisions.
    fn move_by(&mut self, displacement: Vec3) -> MoveOutcome;

    fn position(&self) -> Vec3;

    /// Place the body without sweeping.
    fn set_position(&mut self, position: Vec3);

    fn orientation(&self) -> Quat;

    fn set_orientation(&mut self, orientation: Quat);

    fn capsule(&self) -> CapsuleShape;

    fn set_height(&mut self, height: f32);

    fn set_center(&mut self, center: Vec3);

    /// Speed of the last move, for diagnostics.
    fn velocity_magnitude(&self) -> f32;

    /// The body's own collider in the scene, so queries can skip it.
    fn collider(&self) -> Option<BrushId> {
        None
    }
}

/// Transform and collider state of a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterBody {
    /// World position of the body origin (the feet for a standing capsule).
    pub position: Vec3,
    /// Orientation. Only yaw is applied by the look controller.
    pub orientation: Quat,
    /// Collider geometry.
    pub capsule: CapsuleShape,
    /// Velocity of the last move (meters/second).
    pub velocity: Vec3,
    /// What the body collides with.
    pub collision_mask: ContentFlags,
    /// The body's own brush, if it is registered in the world.
    pub collider: Option<BrushId>,
}

impl CharacterBody {
    pub fn new(position: Vec3, capsule: CapsuleShape) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            capsule,
            velocity: Vec3::ZERO,
            collision_mask: ContentFlags::MASK_PLAYER_SOLID,
            collider: None,
        }
    }

    fn filter(&self) -> QueryFilter {
        QueryFilter::mask(self.collision_mask).ignoring(self.collider)
    }
}

/// Reference [`Mover`]: a body sliding through a collision world.
pub struct BodyMover<'a> {
    body: &'a mut CharacterBody,
    world: &'a CollisionWorld,
    delta_time: f32,
}

impl<'a> BodyMover<'a> {
    /// Borrow `body` and `world` for one frame lasting `delta_time` seconds.
    pub fn new(body: &'a mut CharacterBody, world: &'a CollisionWorld, delta_time: f32) -> Self {
        Self {
            body,
            world,
            delta_time,
        }
    }
}

impl Mover for BodyMover<'_> {
    fn move_by(&mut self, displacement: Vec3) -> MoveOutcome {
        let capsule = self.body.capsule;
        let start = capsule.base(self.body.position);
        let mut base = start;

        let outcome = slide_move(
            self.world,
            &mut base,
            displacement,
            capsule.trace_shape(),
            self.body.filter(),
        );

        self.body.position += base - start;
        self.body.velocity = if self.delta_time > 0.0 {
            (base - start) / self.delta_time
        } else {
            Vec3::ZERO
        };

        outcome
    }

    fn position(&self) -> Vec3 {
        self.body.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.body.position = position;
        self.body.velocity = Vec3::ZERO;
    }

    fn orientation(&self) -> Quat {
        self.body.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.body.orientation = orientation;
    }

    fn capsule(&self) -> CapsuleShape {
        self.body.capsule
    }

    fn set_height(&mut self, height: f32) {
        self.body.capsule.height = height;
    }

    fn set_center(&mut self, center: Vec3) {
        self.body.capsule.center = center;
    }

    fn velocity_magnitude(&self) -> f32 {
        self.body.velocity.length()
    }

    fn collider(&self) -> Option<BrushId> {
        self.body.collider
    }
}

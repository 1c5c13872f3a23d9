//! Horizontal locomotion.
//!
//! Turns the move axis into a world-space direction, eases the speed toward
//! the target for the current state and merges in the vertical velocity.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::config::MovementConfig;
use super::smoothing::SmoothedScalar;
use super::state::MovementState;

/// Ground speeds per state (meters/second).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    pub crouch_speed: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Time for the speed to settle on a new target (seconds).
    pub transition_time: f32,
}

impl SpeedProfile {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            crouch_speed: config.crouch_speed,
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            transition_time: config.speed_transition_time,
        }
    }

    /// Speed the character should settle at in `state`. Airborne and idle
    /// states use the walking speed.
    pub fn target_speed(&self, state: MovementState) -> f32 {
        match state {
            MovementState::Crouching => self.crouch_speed,
            MovementState::Sprinting => self.sprint_speed,
            _ => self.walk_speed,
        }
    }
}

/// World-space move direction for a body with `orientation`.
///
/// `x` strafes along the body's right (+X) and `y` along its forward (+Z).
/// Zero input gives a zero direction.
pub fn move_direction(orientation: Quat, move_axis: Vec2) -> Vec3 {
    (orientation * Vec3::new(move_axis.x, 0.0, move_axis.y)).normalize_or_zero()
}

/// Blended horizontal speed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocomotionIntegrator {
    speed: SmoothedScalar,
}

impl LocomotionIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current blended speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed.value()
    }

    /// Drop the blended speed back to rest.
    pub fn reset(&mut self) {
        self.speed.snap(0.0);
    }

    /// Velocity for this frame (meters/second).
    ///
    /// The caller scales it by the frame time before handing it to the mover.
    pub fn velocity(
        &mut self,
        profile: &SpeedProfile,
        state: MovementState,
        orientation: Quat,
        move_axis: Vec2,
        vertical_velocity: f32,
        delta_time: f32,
    ) -> Vec3 {
        let target = profile.target_speed(state);
        let speed = self.speed.approach(target, delta_time, profile.transition_time);

        let mut velocity = move_direction(orientation, move_axis) * speed;
        velocity.y = vertical_velocity;
        velocity
    }
}

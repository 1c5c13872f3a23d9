//! Jump impulse, gravity and jump cooldown.
//!
//! The integrator owns the vertical velocity. Each frame it may start a jump,
//! then integrates gravity with explicit Euler, then ticks the cooldown.

use serde::{Deserialize, Serialize};

/// Vertical velocity a grounded body is held at so the next probe still
/// finds the floor.
pub const GROUND_STICK_VELOCITY: f32 = -2.0;

/// Per-frame conditions for the integrator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpConditions {
    pub grounded: bool,
    pub jump_enabled: bool,
    /// Jumps are refused while crouched.
    pub crouched: bool,
}

/// Vertical velocity and jump cooldown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpIntegrator {
    vertical_velocity: f32,
    /// Seconds until the next jump is allowed. Can't jump while > 0.
    cooldown: f32,
}

impl JumpIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    #[inline]
    pub fn on_cooldown(&self) -> bool {
        self.cooldown > 0.0
    }

    /// Zero the vertical velocity, e.g. after a teleport.
    pub fn halt(&mut self) {
        self.vertical_velocity = 0.0;
    }

    /// Run one frame.
    ///
    /// `jump_requested` is cleared only when a jump actually starts; a
    /// request that can't be honored stays pending. Returns whether a jump
    /// started this frame.
    pub fn update(
        &mut self,
        jump_requested: &mut bool,
        conditions: JumpConditions,
        impulse: f32,
        gravity: f32,
        cooldown: f32,
        delta_time: f32,
    ) -> bool {
        let can_jump = conditions.grounded
            && conditions.jump_enabled
            && !conditions.crouched
            && self.cooldown <= 0.0;

        let jumped = *jump_requested && can_jump;
        if jumped {
            self.vertical_velocity = impulse;
            *jump_requested = false;
            self.cooldown = cooldown;
        }

        if conditions.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = GROUND_STICK_VELOCITY;
        } else {
            self.vertical_velocity -= gravity * delta_time;
        }

        self.cooldown -= delta_time;

        jumped
    }
}

// ============================================================================
// Tests
// ============================================================================

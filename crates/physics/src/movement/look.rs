//! Mouse look.
//!
//! Yaw turns the whole body and is unbounded. Pitch only tilts the camera
//! pivot and is clamped. The pivot stores its pitch as an unsigned angle in
//! `[0, 360)` degrees, the way engine transforms report Euler angles, so the
//! clamp converts to a signed angle first.

use glam::{Quat, Vec2};
use serde::{Deserialize, Serialize};

use super::body::Mover;
use super::config::MovementConfig;

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Map an unsigned angle in `[0, 360)` to `(-180, 180]`.
#[inline]
pub fn signed_degrees(unsigned: f32) -> f32 {
    if unsigned > 180.0 {
        unsigned - 360.0
    } else {
        unsigned
    }
}

/// The camera mount on the character.
///
/// Owned by the host. The controller writes the pitch during the look pass
/// and the local height during the crouch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPivot {
    /// Pitch in degrees, wrapped to `[0, 360)`. Positive tilts down.
    pub pitch: f32,
    /// Height of the pivot above the body origin (meters).
    pub local_y: f32,
}

impl CameraPivot {
    pub fn new(local_y: f32) -> Self {
        Self { pitch: 0.0, local_y }
    }

    /// Pitch in `(-180, 180]` degrees.
    #[inline]
    pub fn signed_pitch(&self) -> f32 {
        signed_degrees(self.pitch)
    }

    /// Set the pitch from any angle in degrees.
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = wrap_degrees(degrees);
    }

    /// The pivot's local rotation.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians())
    }
}

/// Look sensitivity and pitch limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookController {
    pub horizontal_sensitivity: f32,
    pub vertical_sensitivity: f32,
    pub invert_y: bool,
    pub pitch_lower_limit: f32,
    pub pitch_upper_limit: f32,
}

impl LookController {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            horizontal_sensitivity: config.horizontal_sensitivity,
            vertical_sensitivity: config.vertical_sensitivity,
            invert_y: config.invert_y,
            pitch_lower_limit: config.pitch_lower_limit,
            pitch_upper_limit: config.pitch_upper_limit,
        }
    }

    /// Yaw change in degrees for one frame.
    #[inline]
    pub fn yaw_delta(&self, look: Vec2, delta_time: f32) -> f32 {
        look.x * self.horizontal_sensitivity * delta_time
    }

    /// Pitch change in degrees for one frame. Looking up is negative.
    #[inline]
    pub fn pitch_delta(&self, look: Vec2, delta_time: f32) -> f32 {
        let amount = look.y * self.vertical_sensitivity * delta_time;
        if self.invert_y {
            amount
        } else {
            -amount
        }
    }

    /// New unsigned pitch after adding `delta` to `pitch`, clamped to the
    /// limits.
    pub fn clamp_pitch(&self, pitch: f32, delta: f32) -> f32 {
        let signed = signed_degrees(wrap_degrees(pitch + delta));
        let clamped = signed.clamp(self.pitch_lower_limit, self.pitch_upper_limit);
        wrap_degrees(clamped)
    }

    /// Apply one frame of look input to the body and the camera.
    pub fn apply(&self, look: Vec2, mover: &mut dyn Mover, camera: &mut CameraPivot, delta_time: f32) {
        let yaw = self.yaw_delta(look, delta_time);
        if yaw != 0.0 {
            let orientation = Quat::from_rotation_y(yaw.to_radians()) * mover.orientation();
            mover.set_orientation(orientation.normalize());
        }

        camera.pitch = self.clamp_pitch(camera.pitch, self.pitch_delta(look, delta_time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::test_support::StubMover;
    use glam::Vec3;

    fn look() -> LookController {
        LookController::from_config(&MovementConfig::default())
    }

    #[test]
    fn test_signed_conversion() {
        assert_eq!(signed_degrees(0.0), 0.0);
        assert_eq!(signed_degrees(180.0), 180.0);
        assert_eq!(signed_degrees(350.0), -10.0);
        assert_eq!(wrap_degrees(-10.0), 350.0);
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-1e-9), 0.0);
    }

    #[test]
    fn test_look_up_wraps_below_zero() {
        let look = look();
        let mut mover = StubMover::standing();
        let mut camera = CameraPivot::new(1.6);

        // 120 deg/s for 0.1s = 12 degrees up
        look.apply(Vec2::new(0.0, 1.0), &mut mover, &mut camera, 0.1);

        assert!((camera.pitch - 348.0).abs() < 1e-3);
        assert!((camera.signed_pitch() + 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_invert_y_flips_pitch() {
        let look = LookController {
            invert_y: true,
            ..look()
        };
        let mut mover = StubMover::standing();
        let mut camera = CameraPivot::new(1.6);

        look.apply(Vec2::new(0.0, 1.0), &mut mover, &mut camera, 0.1);
        assert!((camera.pitch - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let look = look();
        let mut mover = StubMover::standing();
        let mut camera = CameraPivot::new(1.6);

        for _ in 0..100 {
            look.apply(Vec2::new(0.0, 1.0), &mut mover, &mut camera, 0.1);
        }
        assert!((camera.signed_pitch() + 80.0).abs() < 1e-3);
        assert!((camera.pitch - 280.0).abs() < 1e-3);

        for _ in 0..100 {
            look.apply(Vec2::new(0.0, -1.0), &mut mover, &mut camera, 0.1);
        }
        assert!((camera.signed_pitch() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_range_pivot_is_pulled_into_limits() {
        let look = look();
        // 200 degrees reads as -160, below the lower limit
        assert!((look.clamp_pitch(200.0, 0.0) - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_yaw_turns_body_right() {
        let look = look();
        let mut mover = StubMover::standing();
        let mut camera = CameraPivot::new(1.6);

        // 120 deg/s for 0.75s = a quarter turn
        look.apply(Vec2::new(1.0, 0.0), &mut mover, &mut camera, 0.75);

        let forward = mover.orientation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-4);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let look = look();
        let mut mover = StubMover::standing();
        let mut camera = CameraPivot::new(1.6);

        // Four full turns in small steps
        for _ in 0..120 {
            look.apply(Vec2::new(1.0, 0.0), &mut mover, &mut camera, 0.1);
        }
        let forward = mover.orientation * Vec3::Z;
        assert!((forward - Vec3::Z).length() < 1e-3);
    }
}

//! Movement configuration.
//!
//! All tunables are grouped here for easy tuning. Values use metric units
//! (meters, seconds) and look angles are in degrees.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::ground::GroundFilter;
use super::input::ActivationMode;

/// Configuration for the first-person movement controller.
///
/// Standing geometry is not configured here: it is captured from the body
/// when the controller is initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Feature toggles
    // ========================================================================
    pub move_enabled: bool,
    pub look_enabled: bool,
    pub jump_enabled: bool,
    pub sprint_enabled: bool,
    pub crouch_enabled: bool,

    /// Whether sprint follows the held key or flips on each press.
    pub sprint_mode: ActivationMode,

    /// Whether crouch follows the held key or flips on each press.
    pub crouch_mode: ActivationMode,

    // ========================================================================
    // Movement Speeds
    // ========================================================================
    /// Crouching speed (meters/second).
    pub crouch_speed: f32,

    /// Walking speed (meters/second). Also used in the air.
    pub walk_speed: f32,

    /// Sprinting speed (meters/second).
    pub sprint_speed: f32,

    /// Time for the speed to get 99% of the way to a new target (seconds).
    pub speed_transition_time: f32,

    // ========================================================================
    // Jumping and Gravity
    // ========================================================================
    /// Apex height of a jump (meters).
    pub jump_height: f32,

    /// Gravity acceleration magnitude (meters/second²).
    pub gravity: f32,

    /// Minimum time between jumps (seconds).
    pub jump_cooldown: f32,

    // ========================================================================
    // Crouching
    // ========================================================================
    /// Capsule height when crouched (meters).
    pub crouching_height: f32,

    /// Capsule center offset when crouched.
    pub crouching_center: Vec3,

    /// Camera pivot local Y when crouched (meters).
    pub crouching_camera_y: f32,

    /// Time for height, center and camera to get 99% of the way (seconds).
    pub crouch_transition_time: f32,

    // ========================================================================
    // Grounding
    // ========================================================================
    /// What the grounding probe is allowed to stand on.
    pub ground_filter: GroundFilter,

    /// Extra radius of the grounding sphere beyond the capsule radius.
    pub ground_probe_margin: f32,

    // ========================================================================
    // Look
    // ========================================================================
    /// Yaw speed (degrees/second at full look input).
    pub horizontal_sensitivity: f32,

    /// Pitch speed (degrees/second at full look input).
    pub vertical_sensitivity: f32,

    /// Pushing look input up pitches the camera down.
    pub invert_y: bool,

    /// Lowest pitch (degrees, negative looks up).
    pub pitch_lower_limit: f32,

    /// Highest pitch (degrees, positive looks down).
    pub pitch_upper_limit: f32,

    // ========================================================================
    // Frame
    // ========================================================================
    /// Largest time step a single update integrates (seconds).
    pub max_delta_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_enabled: true,
            look_enabled: true,
            jump_enabled: true,
            sprint_enabled: true,
            crouch_enabled: true,
            sprint_mode: ActivationMode::Hold,
            crouch_mode: ActivationMode::Hold,

            crouch_speed: 2.0,
            walk_speed: 4.0,
            sprint_speed: 7.0,
            speed_transition_time: 0.2,

            jump_height: 1.2,
            gravity: 20.0,
            jump_cooldown: 0.2,

            crouching_height: 1.0,
            crouching_center: Vec3::new(0.0, 0.5, 0.0),
            crouching_camera_y: 0.8,
            crouch_transition_time: 0.2,

            ground_filter: GroundFilter::AllExceptSelf,
            ground_probe_margin: 0.05,

            horizontal_sensitivity: 120.0,
            vertical_sensitivity: 120.0,
            invert_y: false,
            pitch_lower_limit: -80.0,
            pitch_upper_limit: 80.0,

            max_delta_time: 0.1,
        }
    }
}

impl MovementConfig {
    /// Fast movement with strong gravity and short transitions.
    pub fn arcade() -> Self {
        Self {
            walk_speed: 6.0,
            sprint_speed: 10.0,
            crouch_speed: 3.0,
            speed_transition_time: 0.1,
            gravity: 30.0,
            jump_height: 2.0,
            jump_cooldown: 0.1,
            crouch_transition_time: 0.1,
            ..Default::default()
        }
    }

    /// Slower movement with toggle crouch and long transitions.
    pub fn tactical() -> Self {
        Self {
            walk_speed: 3.0,
            sprint_speed: 5.5,
            crouch_speed: 1.5,
            speed_transition_time: 0.35,
            gravity: 15.0,
            jump_height: 0.8,
            jump_cooldown: 0.4,
            crouch_mode: ActivationMode::Toggle,
            crouch_transition_time: 0.3,
            ..Default::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("crouch_speed", self.crouch_speed),
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("speed_transition_time", self.speed_transition_time),
            ("jump_height", self.jump_height),
            ("gravity", self.gravity),
            ("jump_cooldown", self.jump_cooldown),
            ("crouching_height", self.crouching_height),
            ("crouching_center.x", self.crouching_center.x),
            ("crouching_center.y", self.crouching_center.y),
            ("crouching_center.z", self.crouching_center.z),
            ("crouching_camera_y", self.crouching_camera_y),
            ("crouch_transition_time", self.crouch_transition_time),
            ("ground_probe_margin", self.ground_probe_margin),
            ("horizontal_sensitivity", self.horizontal_sensitivity),
            ("vertical_sensitivity", self.vertical_sensitivity),
            ("pitch_lower_limit", self.pitch_lower_limit),
            ("pitch_upper_limit", self.pitch_upper_limit),
            ("max_delta_time", self.max_delta_time),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        for (name, value) in [
            ("crouch_speed", self.crouch_speed),
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeSpeed { name, value });
            }
        }

        for (name, value) in [
            ("jump_height", self.jump_height),
            ("gravity", self.gravity),
            ("crouching_height", self.crouching_height),
            ("max_delta_time", self.max_delta_time),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.pitch_lower_limit > self.pitch_upper_limit {
            return Err(ConfigError::InvertedPitchLimits {
                lower: self.pitch_lower_limit,
                upper: self.pitch_upper_limit,
            });
        }

        Ok(())
    }

    /// Initial vertical velocity that reaches `jump_height` under `gravity`.
    #[inline]
    pub fn jump_impulse(&self) -> f32 {
        (2.0 * self.jump_height * self.gravity).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MovementConfig::default();
        assert!(config.validate().is_ok());
        assert!(MovementConfig::arcade().validate().is_ok());
        assert!(MovementConfig::tactical().validate().is_ok());
    }

    #[test]
    fn test_jump_impulse_formula() {
        let config = MovementConfig {
            jump_height: 2.0,
            gravity: 30.0,
            ..Default::default()
        };
        assert!((config.jump_impulse() - 10.954_451).abs() < 1e-4);
    }

    #[test]
    fn test_negative_speed_rejected() {
        let config = MovementConfig {
            sprint_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeSpeed { name: "sprint_speed", .. })
        ));
    }

    #[test]
    fn test_inverted_pitch_limits_rejected() {
        let config = MovementConfig {
            pitch_lower_limit: 10.0,
            pitch_upper_limit: -10.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvertedPitchLimits { .. })));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let config = MovementConfig {
            pitch_upper_limit: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { name: "pitch_upper_limit", .. })
        ));

        let config = MovementConfig {
            speed_transition_time: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { name: "speed_transition_time", .. })
        ));

        let config = MovementConfig {
            crouch_transition_time: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { name: "crouch_transition_time", .. })
        ));

        let config = MovementConfig {
            pitch_lower_limit: f32::NEG_INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MovementConfig::from_json_str(r#"{ "walk_speed": 5.5, "crouch_mode": "Toggle" }"#)
            .expect("config should parse");

        assert_eq!(config.walk_speed, 5.5);
        assert_eq!(config.crouch_mode, ActivationMode::Toggle);
        assert_eq!(config.sprint_speed, MovementConfig::default().sprint_speed);
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(
            MovementConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MovementConfig::from_json_str(r#"{ "gravity": 0.0 }"#),
            Err(ConfigError::NonPositive { name: "gravity", .. })
        ));
    }
}

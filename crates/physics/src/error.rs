//! Error types for controller setup.
//!
//! Nothing in the per-frame path fails in steady state. Errors only surface
//! when a controller is configured or initialized incorrectly.

use thiserror::Error;

/// A movement configuration that violates one of its invariants.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must not be negative (got {value})")]
    NegativeSpeed { name: &'static str, value: f32 },

    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be a finite number (got {value})")]
    NonFinite { name: &'static str, value: f32 },

    #[error("crouching height {crouching} exceeds standing height {standing}")]
    CrouchTallerThanStanding { crouching: f32, standing: f32 },

    #[error("crouching height {crouching} is shorter than the capsule diameter {diameter}")]
    CrouchShorterThanDiameter { crouching: f32, diameter: f32 },

    #[error("pitch limits are inverted: lower {lower} > upper {upper}")]
    InvertedPitchLimits { lower: f32, upper: f32 },

    #[error("failed to parse movement config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reported by the character controller lifecycle.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("controller has not been initialized")]
    NotInitialized,

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

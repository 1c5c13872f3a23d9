//! Stride Physics
//!
//! A first-person character controller: per-frame input in, one capsule
//! displacement and a camera orientation out.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: Static geometry that answers ray, overlap and sweep queries
//! - **Movement**: The controller, its state machine and integrators, and a
//!   reference capsule mover built on collision sweeps
//!
//! The controller never owns the body or the scene. Both are reached through
//! the [`Mover`] and [`SpatialQuery`] traits and borrowed for one call at a
//! time, so hosts can plug in their own physics backend.

pub mod collision;
pub mod error;
pub mod movement;

// Re-export commonly used types
pub use collision::{CollisionWorld, ContentFlags, QueryFilter, SpatialQuery, TraceResult, TraceShape};
pub use error::{ConfigError, ControllerError};
pub use movement::{
    BodyMover, CameraPivot, CapsuleShape, CharacterBody, CharacterController, FrameReport, InputEvent, InputPhase,
    MovementConfig, MovementState, Mover,
};

//! First-person character movement.
//!
//! This module implements a capsule character controller with:
//!
//! - A six-state locomotion classifier (idle, walk, sprint, crouch, jump, fall)
//! - Exponentially smoothed speed and crouch transitions
//! - Jumping with a cooldown and a ground-stick clamp
//! - Crouching with overhead obstruction checks
//! - Mouse look with clamped pitch
//! - Multi-plane collision sliding for the reference mover
//!
//! # Design
//!
//! Movement is driven by the [`CharacterController`], which drains queued
//! [`InputEvent`]s once per frame and commits a single displacement through
//! a [`Mover`]. Scene queries go through [`SpatialQuery`](crate::collision::SpatialQuery).
//!
//! Per frame: input, grounding probe, state classifier, crouch transition,
//! jump/gravity and locomotion, move, look.

mod body;
mod config;
mod controller;
mod crouch;
mod ground;
mod input;
mod jump;
mod locomotion;
mod look;
mod obstruction;
mod slide_move;
mod smoothing;
mod state;

#[cfg(test)]
mod test_support;

pub use body::{BodyMover, CapsuleShape, CharacterBody, Mover};
pub use config::MovementConfig;
pub use controller::{CharacterController, FrameReport};
pub use crouch::{CrouchController, CrouchFrame, CrouchProfile, CrouchTargets, STAND_TOLERANCE};
pub use ground::{GroundFilter, GroundSample, GroundTransition, GroundingProbe};
pub use input::{ActivationMode, InputEvent, InputPhase, InputQueue, InputState};
pub use jump::{JumpConditions, JumpIntegrator, GROUND_STICK_VELOCITY};
pub use locomotion::{move_direction, LocomotionIntegrator, SpeedProfile};
pub use look::{signed_degrees, wrap_degrees, CameraPivot, LookController};
pub use obstruction::{ObstructionResolver, CLIPPING_MARGIN, PROBE_REACH};
pub use slide_move::{clip_against_plane, slide_move, MoveOutcome};
pub use smoothing::{blend_factor, SmoothedScalar, SmoothedVector};
pub use state::{classify, classify_airborne, classify_grounded, ClassifierInput, MovementState};

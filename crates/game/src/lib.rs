//! Stride Game Host
//!
//! This crate hosts the movement controller in a small game loop:
//!
//! - Raw keyboard/mouse state translated into controller input events
//! - Levels with collision geometry and spawn points
//! - Players pairing a capsule body and camera with a controller
//! - A fixed-tick simulation that drives every player
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌─────────────┐    ┌─────────────────┐    ┌──────────────┐  │
//! │  │ PlayerInput │───►│ InputTranslator │───►│ Character    │  │
//! │  │ (raw keys,  │    │ (edges, axes)   │    │ Controller   │  │
//! │  │  mouse)     │    └─────────────────┘    └──────┬───────┘  │
//! │  └─────────────┘                                  │          │
//! │                      ┌────────────────────────────▼───────┐  │
//! │                      │ BodyMover + Level collision world  │  │
//! │                      └────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod input;
pub mod level;
pub mod player;
pub mod simulation;

// Re-export main types
pub use input::{InputTranslator, PlayerInput};
pub use level::{Level, SpawnPoint};
pub use player::{EntityId, Player};
pub use simulation::{Simulation, SimulationBuilder, SimulationConfig, SimulationError};

// Re-export physics types for convenience
pub use stride_physics::{
    CharacterController, CollisionWorld, ContentFlags, FrameReport, InputEvent, MovementConfig, MovementState,
    TraceResult, TraceShape,
};

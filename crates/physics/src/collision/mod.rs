//! Collision detection for character movement.
//!
//! This module provides a reference scene for the movement controller:
//!
//! - [`CollisionWorld`]: static brushes backed by parry3d shapes
//! - [`TraceResult`] / [`TraceShape`]: sweeps of capsules, spheres and points
//! - [`SpatialQuery`]: the narrow query interface the controller consumes
//!
//! # Tracing Algorithm
//!
//! Sweeps binary-search the first colliding fraction along the path and derive
//! the hit normal from the penetration at the first blocked sample.

mod flags;
mod query;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use query::SpatialQuery;
pub use trace::{TraceResult, TraceShape};
pub use world::{BrushId, CollisionBrush, CollisionWorld, QueryFilter};

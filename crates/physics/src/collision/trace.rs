//! Trace results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;
use super::world::BrushId;

/// Result of sweeping a shape through the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the trace path we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub fraction: f32,

    /// Final position of the shape's base after the trace.
    pub end_position: Vec3,

    /// Surface normal at the impact point, pointing away from the surface.
    ///
    /// `None` if no collision occurred.
    pub hit_normal: Option<Vec3>,

    /// Content flags of what was hit.
    pub hit_contents: ContentFlags,

    /// Whether the trace started inside solid geometry.
    pub started_in_solid: bool,

    /// Whether the shape was stuck for the whole trace.
    pub all_solid: bool,

    /// Brush that stopped the trace, if any.
    pub hit_brush: Option<BrushId>,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            started_in_solid: false,
            all_solid: false,
            hit_brush: None,
        }
    }

    /// Create a trace result indicating a collision occurred.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3) -> Self {
        Self {
            fraction,
            end_position,
            hit_normal: Some(normal),
            hit_contents: ContentFlags::SOLID,
            started_in_solid: false,
            all_solid: false,
            hit_brush: None,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Shape used for collision traces.
///
/// Positions passed alongside a shape always name the bottom-center of the
/// shape, so a capsule standing on a floor at `y = 0` is traced from `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (pill shape).
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height from bottom of lower cap to top of upper cap.
        height: f32,
    },

    /// A sphere.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },

    /// A single point. Used for ray-like traces.
    Point,
}

impl TraceShape {
    /// Get the effective radius of this shape.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } | Self::Sphere { radius } => *radius,
            Self::Point => 0.0,
        }
    }

    /// Get the height of this shape.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Sphere { radius } => radius * 2.0,
            Self::Point => 0.0,
        }
    }

    /// Offset from the base of the shape to its geometric center.
    #[inline]
    pub fn center_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.height() * 0.5, 0.0)
    }
}

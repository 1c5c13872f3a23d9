//! Overhead clearance check used when standing back up.

use glam::Vec3;

use crate::collision::{QueryFilter, SpatialQuery};

/// Extra reach of the ray beyond the standing height.
pub const PROBE_REACH: f32 = 0.15;

/// Gap kept between the head and the ceiling.
pub const CLIPPING_MARGIN: f32 = 0.1;

/// Distance the ray starts above the capsule base, so a floor touching the
/// base is not reported as a ceiling.
const RAY_SKIN: f32 = 0.01;

/// Computes how tall the capsule may grow at its current spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstructionResolver {
    pub standing_height: f32,
    pub crouching_height: f32,
}

impl ObstructionResolver {
    pub fn new(standing_height: f32, crouching_height: f32) -> Self {
        Self {
            standing_height,
            crouching_height,
        }
    }

    /// Maximum standable height for a capsule whose base is at `base`.
    ///
    /// Always within `[crouching_height, standing_height]`; no hit means the
    /// full standing height is available.
    pub fn max_allowed_height(&self, query: &dyn SpatialQuery, base: Vec3, filter: QueryFilter) -> f32 {
        let origin = base + Vec3::Y * RAY_SKIN;
        let reach = self.standing_height + PROBE_REACH - RAY_SKIN;

        match query.raycast(origin, Vec3::Y, reach, filter) {
            Some(distance) => {
                let allowed = distance + RAY_SKIN - CLIPPING_MARGIN;
                allowed.clamp(self.crouching_height, self.standing_height)
            }
            None => self.standing_height,
        }
    }
}

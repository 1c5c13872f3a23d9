//! Collide-and-slide for capsule displacements.
//!
//! The mover hands a whole frame's displacement to [`slide_move`], which
//! sweeps the capsule, stops at the first contact and keeps sliding the
//! leftover displacement along every surface touched so far.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, QueryFilter, TraceShape};

/// Maximum number of collision planes to track during a slide.
const MAX_CLIP_PLANES: usize = 5;

/// Overbounce factor for clipping (prevents sticking to surfaces).
const OVERBOUNCE: f32 = 1.001;

/// Surfaces with a normal Y at or above this count as floor contacts.
const FLOOR_NORMAL_Y: f32 = 0.7;

/// Which sides of the capsule touched something during a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome(pub u8);

impl MoveOutcome {
    pub const NONE: u8 = 0;
    /// Touched a floor-like surface.
    pub const BELOW: u8 = 1 << 0;
    /// Touched a ceiling-like surface.
    pub const ABOVE: u8 = 1 << 1;
    /// Touched a wall.
    pub const SIDES: u8 = 1 << 2;

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    #[inline]
    pub fn collided(self) -> bool {
        self.0 != Self::NONE
    }

    /// Classify a contact normal and record it.
    pub fn record(&mut self, normal: Vec3) {
        if normal.y >= FLOOR_NORMAL_Y {
            self.set(Self::BELOW);
        } else if normal.y <= -FLOOR_NORMAL_Y {
            self.set(Self::ABOVE);
        } else {
            self.set(Self::SIDES);
        }
    }
}

/// Clip a displacement against a surface normal.
///
/// Removes the component going into the surface, with a small overbounce.
pub fn clip_against_plane(displacement: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = displacement.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    displacement - normal * adjusted_backoff
}

/// Move a shape whose base sits at `base` by `displacement`, sliding along
/// whatever it hits.
///
/// `base` is updated in place.
pub fn slide_move(
    world: &CollisionWorld,
    base: &mut Vec3,
    displacement: Vec3,
    shape: TraceShape,
    filter: QueryFilter,
) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    let mut remaining = displacement;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    for _ in 0..MAX_CLIP_PLANES {
        if remaining.length_squared() < 1e-10 {
            break;
        }

        let trace = world.trace(*base, *base + remaining, shape, filter);

        if trace.all_solid {
            // Stuck in geometry - push out and retry what is left
            *base = world.resolve_penetration(*base, shape, filter);
            if let Some(normal) = trace.hit_normal {
                outcome.record(normal);
            }
            continue;
        }

        *base = trace.end_position;
        if !trace.hit_something() {
            break;
        }

        let normal = trace.hit_normal.unwrap_or(Vec3::Y);
        outcome.record(normal);
        remaining *= 1.0 - trace.fraction;

        if num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        // Find a clip that doesn't push into any touched plane
        let mut clipped = None;
        for i in 0..num_planes {
            let candidate = clip_against_plane(remaining, planes[i], OVERBOUNCE);
            let valid = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| candidate.dot(planes[j]) >= -0.001);
            if valid {
                clipped = Some(candidate);
                break;
            }
        }

        remaining = match clipped {
            Some(clipped) => clipped,
            None if num_planes >= 2 => {
                // Slide along the crease between the first two planes
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                crease * remaining.dot(crease)
            }
            None => break,
        };
    }

    outcome
}

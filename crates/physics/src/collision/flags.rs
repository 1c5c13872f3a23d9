//! Content flags for collision filtering.
//!
//! Every brush in the [`CollisionWorld`](super::CollisionWorld) carries a set of
//! content flags. Queries pass a mask and only brushes whose contents intersect
//! the mask take part.

use serde::{Deserialize, Serialize};

/// Content flags describe what kind of volume a brush is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, ceilings.
    pub const SOLID: Self = Self(1 << 0);

    /// Walkable surface. Used by the ground-only grounding filter.
    pub const GROUND: Self = Self(1 << 1);

    /// Player clip - blocks characters but nothing else.
    pub const PLAYER_CLIP: Self = Self(1 << 2);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Character body - another character's collider.
    pub const PLAYER_BODY: Self = Self(1 << 4);

    /// Everything a moving character collides with.
    pub const MASK_PLAYER_SOLID: Self = Self(
        Self::SOLID.0 | Self::GROUND.0 | Self::PLAYER_CLIP.0 | Self::PLAYER_BODY.0,
    );

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Remove flags from this set.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

//! Ground detection.
//!
//! The probe tests a sphere slightly larger than the capsule's lower cap,
//! centered on that cap. Anything the sphere touches counts as ground.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{BrushId, ContentFlags, QueryFilter, SpatialQuery};

use super::body::CapsuleShape;

/// What the grounding probe may stand on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundFilter {
    /// Any solid geometry except the body's own collider.
    #[default]
    AllExceptSelf,
    /// Only geometry flagged [`ContentFlags::GROUND`].
    GroundOnly,
}

impl GroundFilter {
    /// Query filter for a body whose own collider is `own`.
    pub fn query_filter(self, own: Option<BrushId>) -> QueryFilter {
        let mask = match self {
            Self::AllExceptSelf => ContentFlags::MASK_PLAYER_SOLID,
            Self::GroundOnly => ContentFlags::GROUND,
        };
        QueryFilter::mask(mask).ignoring(own)
    }
}

/// An edge in the grounded signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundTransition {
    /// Airborne last frame, grounded now.
    Landed,
    /// Grounded last frame, airborne now.
    LeftGround,
}

/// Result of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundSample {
    pub grounded: bool,
    pub transition: Option<GroundTransition>,
}

/// Grounded signal with edge detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundingProbe {
    grounded: bool,
}

impl GroundingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest grounded value.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Where the probe sphere goes for a body at `position`.
    #[inline]
    pub fn probe_point(capsule: &CapsuleShape, position: Vec3) -> Vec3 {
        capsule.bottom_sphere_center(position)
    }

    /// Probe the scene and record the edge, if any.
    pub fn update(
        &mut self,
        query: &dyn SpatialQuery,
        capsule: &CapsuleShape,
        position: Vec3,
        margin: f32,
        filter: QueryFilter,
    ) -> GroundSample {
        let point = Self::probe_point(capsule, position);
        let grounded = query.overlap_sphere(point, capsule.radius + margin, filter);

        let transition = match (self.grounded, grounded) {
            (false, true) => Some(GroundTransition::Landed),
            (true, false) => Some(GroundTransition::LeftGround),
            _ => None,
        };
        if let Some(edge) = transition {
            log::debug!("ground transition {:?} at {:?}", edge, position);
        }

        self.grounded = grounded;
        GroundSample { grounded, transition }
    }

    /// Forget the previous value, e.g. after a teleport.
    pub fn reset(&mut self) {
        self.grounded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionWorld;
    use std::cell::Cell;

    /// Reports ground whenever the probe sphere dips below `floor_y`.
    struct FlatGround {
        floor_y: f32,
        last_probe: Cell<Option<(Vec3, f32)>>,
    }

    impl SpatialQuery for FlatGround {
        fn overlap_sphere(&self, point: Vec3, radius: f32, _filter: QueryFilter) -> bool {
            self.last_probe.set(Some((point, radius)));
            point.y - radius <= self.floor_y
        }

        fn raycast(&self, _origin: Vec3, _direction: Vec3, _max: f32, _filter: QueryFilter) -> Option<f32> {
            None
        }
    }

    fn ground() -> FlatGround {
        FlatGround {
            floor_y: 0.0,
            last_probe: Cell::new(None),
        }
    }

    #[test]
    fn test_probe_point_and_radius() {
        let scene = ground();
        let capsule = CapsuleShape::standing(0.5, 2.0);
        let mut probe = GroundingProbe::new();

        probe.update(&scene, &capsule, Vec3::new(2.0, 0.0, 0.0), 0.05, QueryFilter::default());

        let (point, radius) = scene.last_probe.get().unwrap();
        assert_eq!(point, Vec3::new(2.0, 0.5, 0.0));
        assert!((radius - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_edges_are_reported_once() {
        let scene = ground();
        let capsule = CapsuleShape::standing(0.5, 2.0);
        let mut probe = GroundingProbe::new();
        let filter = QueryFilter::default();

        let landed = probe.update(&scene, &capsule, Vec3::new(0.0, 0.02, 0.0), 0.05, filter);
        assert!(landed.grounded);
        assert_eq!(landed.transition, Some(GroundTransition::Landed));

        let steady = probe.update(&scene, &capsule, Vec3::ZERO, 0.05, filter);
        assert_eq!(steady.transition, None);

        let left = probe.update(&scene, &capsule, Vec3::new(0.0, 0.2, 0.0), 0.05, filter);
        assert!(!left.grounded);
        assert_eq!(left.transition, Some(GroundTransition::LeftGround));
    }

    #[test]
    fn test_ground_only_filter_mask() {
        let filter = GroundFilter::GroundOnly.query_filter(Some(7));
        assert_eq!(filter.mask, ContentFlags::GROUND);
        assert_eq!(filter.ignore, Some(7));

        let filter = GroundFilter::AllExceptSelf.query_filter(None);
        assert_eq!(filter.mask, ContentFlags::MASK_PLAYER_SOLID);
    }

    #[test]
    fn test_ground_only_probe_ignores_plain_solids() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(5.0, 0.5, 5.0), ContentFlags::SOLID);
        let capsule = CapsuleShape::standing(0.4, 1.8);

        let mut probe = GroundingProbe::new();
        let sample = probe.update(&world, &capsule, Vec3::ZERO, 0.05, GroundFilter::GroundOnly.query_filter(None));
        assert!(!sample.grounded);

        let mut probe = GroundingProbe::new();
        let sample = probe.update(&world, &capsule, Vec3::ZERO, 0.05, GroundFilter::AllExceptSelf.query_filter(None));
        assert!(sample.grounded);
    }

    #[test]
    fn test_reset_reports_landing_again() {
        let scene = ground();
        let capsule = CapsuleShape::standing(0.5, 2.0);
        let mut probe = GroundingProbe::new();
        probe.update(&scene, &capsule, Vec3::ZERO, 0.05, QueryFilter::default());

        probe.reset();
        assert!(!probe.is_grounded());

        let sample = probe.update(&scene, &capsule, Vec3::ZERO, 0.05, QueryFilter::default());
        assert_eq!(sample.transition, Some(GroundTransition::Landed));
    }
}

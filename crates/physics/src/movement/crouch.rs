//! Crouch transitions.
//!
//! Every frame the controller picks target capsule height, capsule center
//! and camera height, then eases toward them. Standing back up asks the
//! [`ObstructionResolver`] how much room there is; with a low ceiling the
//! capsule settles at a partial height and the character counts as
//! obstructed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{QueryFilter, SpatialQuery};
use crate::error::ConfigError;

use super::body::{CapsuleShape, Mover};
use super::config::MovementConfig;
use super::obstruction::ObstructionResolver;
use super::smoothing::{SmoothedScalar, SmoothedVector};
use super::state::MovementState;

/// How close to full height counts as standing.
pub const STAND_TOLERANCE: f32 = 0.05;

/// Capsule height, capsule center and camera height for one pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrouchTargets {
    pub height: f32,
    pub center: Vec3,
    pub camera_y: f32,
}

/// Standing and crouching poses plus the transition time between them.
///
/// The standing pose is captured from the body when the controller is
/// initialized; the crouching pose comes from [`MovementConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrouchProfile {
    pub standing: CrouchTargets,
    pub crouching: CrouchTargets,
    pub transition_time: f32,
}

impl CrouchProfile {
    pub fn new(standing: &CapsuleShape, standing_camera_y: f32, config: &MovementConfig) -> Result<Self, ConfigError> {
        if config.crouching_height > standing.height {
            return Err(ConfigError::CrouchTallerThanStanding {
                crouching: config.crouching_height,
                standing: standing.height,
            });
        }
        // A crouched capsule still has to fit both end caps
        let diameter = 2.0 * standing.radius;
        if config.crouching_height < diameter {
            return Err(ConfigError::CrouchShorterThanDiameter {
                crouching: config.crouching_height,
                diameter,
            });
        }

        Ok(Self {
            standing: CrouchTargets {
                height: standing.height,
                center: standing.center,
                camera_y: standing_camera_y,
            },
            crouching: CrouchTargets {
                height: config.crouching_height,
                center: config.crouching_center,
                camera_y: config.crouching_camera_y,
            },
            transition_time: config.crouch_transition_time,
        })
    }

    /// Pose for a capsule of `height`, interpolated between crouching and
    /// standing.
    pub fn partial(&self, height: f32) -> CrouchTargets {
        let height = height.min(self.standing.height);
        let span = self.standing.height - self.crouching.height;
        let t = if span > 0.0 {
            ((height - self.crouching.height) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        CrouchTargets {
            height,
            center: self.crouching.center.lerp(self.standing.center, t),
            camera_y: self.crouching.camera_y + (self.standing.camera_y - self.crouching.camera_y) * t,
        }
    }

    pub fn resolver(&self) -> ObstructionResolver {
        ObstructionResolver::new(self.standing.height, self.crouching.height)
    }
}

/// What the crouch controller reads from the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrouchFrame {
    pub crouch_input: bool,
    pub grounded: bool,
    pub state: MovementState,
}

/// Drives the capsule and camera between standing and crouching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrouchController {
    height: SmoothedScalar,
    center: SmoothedVector,
    camera_y: SmoothedScalar,
    obstructed: bool,
    targets: CrouchTargets,
}

impl CrouchController {
    /// Start fully standing.
    pub fn new(profile: &CrouchProfile) -> Self {
        Self {
            height: SmoothedScalar::new(profile.standing.height),
            center: SmoothedVector::new(profile.standing.center),
            camera_y: SmoothedScalar::new(profile.standing.camera_y),
            obstructed: false,
            targets: profile.standing,
        }
    }

    /// Whether the last pass found too little room to stand.
    #[inline]
    pub fn is_obstructed(&self) -> bool {
        self.obstructed
    }

    /// Targets chosen by the last pass.
    #[inline]
    pub fn targets(&self) -> CrouchTargets {
        self.targets
    }

    /// Crouch on input unless airborne, and stay crouched in the air if
    /// the capsule is not back to full height.
    pub fn should_crouch(profile: &CrouchProfile, frame: &CrouchFrame, current_height: f32) -> bool {
        let intentional = frame.crouch_input && !frame.state.is_airborne();
        let held_in_air = !frame.grounded && current_height < profile.standing.height - STAND_TOLERANCE;
        intentional || held_in_air
    }

    /// Pick targets and ease toward them.
    ///
    /// Writes the new height and center to `mover` and returns the camera
    /// height for the pivot.
    pub fn update(
        &mut self,
        profile: &CrouchProfile,
        frame: &CrouchFrame,
        mover: &mut dyn Mover,
        query: &dyn SpatialQuery,
        filter: QueryFilter,
        delta_time: f32,
    ) -> f32 {
        let capsule = mover.capsule();
        let was_obstructed = self.obstructed;

        if Self::should_crouch(profile, frame, capsule.height) {
            self.targets = profile.crouching;
            self.obstructed = false;
        } else {
            let base = capsule.base(mover.position());
            let max_height = profile.resolver().max_allowed_height(query, base, filter);

            if max_height >= profile.standing.height - STAND_TOLERANCE {
                self.targets = profile.standing;
                self.obstructed = false;
            } else {
                self.targets = profile.partial(max_height);
                self.obstructed = true;
            }
        }

        if was_obstructed != self.obstructed {
            log::debug!(
                "overhead obstruction {} (target height {:.2})",
                if self.obstructed { "set" } else { "cleared" },
                self.targets.height
            );
        }

        let duration = profile.transition_time;
        let height = self.height.approach(self.targets.height, delta_time, duration);
        let center = self.center.approach(self.targets.center, delta_time, duration);
        let camera_y = self.camera_y.approach(self.targets.camera_y, delta_time, duration);

        mover.set_height(height);
        mover.set_center(center);

        camera_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::test_support::{StubMover, StubScene};

    const DT: f32 = 1.0 / 60.0;

    /// Fails the test if the resolver is consulted.
    struct NoRaycasts;

    impl SpatialQuery for NoRaycasts {
        fn overlap_sphere(&self, _point: Vec3, _radius: f32, _filter: QueryFilter) -> bool {
            true
        }

        fn raycast(&self, _origin: Vec3, _direction: Vec3, _max: f32, _filter: QueryFilter) -> Option<f32> {
            panic!("obstruction resolver should not run while crouching");
        }
    }

    fn profile() -> CrouchProfile {
        CrouchProfile::new(&CapsuleShape::standing(0.5, 2.0), 1.6, &MovementConfig::default())
            .expect("profile should build")
    }

    fn grounded(crouch_input: bool) -> CrouchFrame {
        CrouchFrame {
            crouch_input,
            grounded: true,
            state: if crouch_input {
                MovementState::Crouching
            } else {
                MovementState::Idle
            },
        }
    }

    fn settle(
        controller: &mut CrouchController,
        profile: &CrouchProfile,
        frame: CrouchFrame,
        mover: &mut StubMover,
        query: &dyn SpatialQuery,
    ) -> f32 {
        let mut camera_y = 0.0;
        for _ in 0..120 {
            camera_y = controller.update(profile, &frame, mover, query, QueryFilter::default(), DT);
        }
        camera_y
    }

    #[test]
    fn test_profile_rejects_crouch_shorter_than_capsule_diameter() {
        let config = MovementConfig {
            crouching_height: 0.5,
            ..Default::default()
        };
        let result = CrouchProfile::new(&CapsuleShape::standing(0.4, 1.8), 1.6, &config);
        assert!(matches!(result, Err(ConfigError::CrouchShorterThanDiameter { .. })));

        // Exactly the diameter is still a valid capsule
        let config = MovementConfig {
            crouching_height: 0.8,
            ..Default::default()
        };
        assert!(CrouchProfile::new(&CapsuleShape::standing(0.4, 1.8), 1.6, &config).is_ok());
    }

    #[test]
    fn test_profile_rejects_crouch_taller_than_standing() {
        let config = MovementConfig {
            crouching_height: 2.5,
            ..Default::default()
        };
        let result = CrouchProfile::new(&CapsuleShape::standing(0.5, 2.0), 1.6, &config);
        assert!(matches!(result, Err(ConfigError::CrouchTallerThanStanding { .. })));
    }

    #[test]
    fn test_crouch_input_reaches_crouching_pose() {
        let profile = profile();
        let mut controller = CrouchController::new(&profile);
        let mut mover = StubMover::standing();

        let camera_y = settle(&mut controller, &profile, grounded(true), &mut mover, &StubScene::floor());

        assert!((mover.capsule.height - 1.0).abs() < 1e-3);
        assert!((mover.capsule.center - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-3);
        assert!((camera_y - 0.8).abs() < 1e-3);
        assert!(!controller.is_obstructed());
    }

    #[test]
    fn test_crouch_input_wins_over_clear_overhead() {
        let profile = profile();
        let mut controller = CrouchController::new(&profile);
        let mut mover = StubMover::standing();

        controller.update(&profile, &grounded(true), &mut mover, &NoRaycasts, QueryFilter::default(), DT);

        assert_eq!(controller.targets(), profile.crouching);
        assert!(!controller.is_obstructed());
    }

    #[test]
    fn test_stands_up_under_open_sky() {
        let profile = profile();
        let mut controller = CrouchController::new(&profile);
        let mut mover = StubMover::standing();
        let scene = StubScene::floor();

        settle(&mut controller, &profile, grounded(true), &mut mover, &scene);
        let camera_y = settle(&mut controller, &profile, grounded(false), &mut mover, &scene);

        assert_eq!(controller.targets(), profile.standing);
        assert!((mover.capsule.height - 2.0).abs() < 1e-3);
        assert!((camera_y - 1.6).abs() < 1e-3);
    }

    #[test]
    fn test_low_ceiling_gives_partial_stand() {
        let profile = profile();
        let mut controller = CrouchController::new(&profile);
        let mut mover = StubMover::standing();
        let scene = StubScene::with_ceiling(1.6);

        settle(&mut controller, &profile, grounded(true), &mut mover, &scene);
        let camera_y = settle(&mut controller, &profile, grounded(false), &mut mover, &scene);

        // 1.6 ceiling - 0.1 margin = 1.5, halfway between the poses
        assert!(controller.is_obstructed());
        assert!((controller.targets().height - 1.5).abs() < 1e-4);
        assert!((mover.capsule.height - 1.5).abs() < 1e-3);
        assert!((mover.capsule.center - Vec3::new(0.0, 0.75, 0.0)).length() < 1e-3);
        assert!((camera_y - 1.2).abs() < 1e-3);
    }

    #[test]
    fn test_ceiling_within_tolerance_counts_as_standing() {
        let profile = profile();
        let mut controller = CrouchController::new(&profile);
        let mut mover = StubMover::standing();

        // Allows 1.97, within 0.05 of full height
        controller.update(
            &profile,
            &grounded(false),
            &mut mover,
            &StubScene::with_ceiling(2.07),
            QueryFilter::default(),
            DT,
        );

        assert_eq!(controller.targets(), profile.standing);
        assert!(!controller.is_obstructed());
    }

    #[test]
    fn test_stays_crouched_in_the_air() {
        let profile = profile();
        let mut controller = CrouchController::new(&profile);
        let mut mover = StubMover::standing();

        settle(&mut controller, &profile, grounded(true), &mut mover, &StubScene::floor());

        // Crouch released mid-air, capsule still short
        let falling = CrouchFrame {
            crouch_input: false,
            grounded: false,
            state: MovementState::Falling,
        };
        controller.update(&profile, &falling, &mut mover, &NoRaycasts, QueryFilter::default(), DT);
        assert_eq!(controller.targets(), profile.crouching);
    }

    #[test]
    fn test_crouch_input_ignored_while_jumping_at_full_height() {
        let profile = profile();
        let frame = CrouchFrame {
            crouch_input: true,
            grounded: false,
            state: MovementState::Jumping,
        };
        assert!(!CrouchController::should_crouch(&profile, &frame, 2.0));
        assert!(CrouchController::should_crouch(&profile, &frame, 1.9));
    }

    #[test]
    fn test_partial_pose_interpolation() {
        let profile = profile();

        assert_eq!(profile.partial(1.0), profile.crouching);
        assert_eq!(profile.partial(2.0).height, 2.0);
        assert_eq!(profile.partial(3.0).height, 2.0);

        let quarter = profile.partial(1.25);
        assert!((quarter.camera_y - 1.0).abs() < 1e-5);
        assert!((quarter.center.y - 0.625).abs() < 1e-5);
    }
}

//! First-person character controller.
//!
//! This is the main entry point for character movement. It owns the input
//! queue and every piece of per-character runtime state, and borrows the
//! mover, the camera pivot and the spatial query service for the duration
//! of each call.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::SpatialQuery;
use crate::error::{ConfigError, ControllerError};

use super::body::Mover;
use super::config::MovementConfig;
use super::crouch::{CrouchController, CrouchFrame, CrouchProfile};
use super::ground::{GroundTransition, GroundingProbe};
use super::input::{InputEvent, InputQueue, InputState};
use super::jump::{JumpConditions, JumpIntegrator};
use super::locomotion::{LocomotionIntegrator, SpeedProfile};
use super::look::{CameraPivot, LookController};
use super::slide_move::MoveOutcome;
use super::state::{classify, ClassifierInput, MovementState};

/// Diagnostics for one frame of movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub state: MovementState,
    pub grounded: bool,
    /// Landing or leaving the ground this frame.
    pub transition: Option<GroundTransition>,
    /// A jump started this frame.
    pub jumped: bool,
    /// Blended horizontal speed (meters/second).
    pub speed: f32,
    pub vertical_velocity: f32,
    /// Displacement handed to the mover.
    pub displacement: Vec3,
    pub outcome: MoveOutcome,
    /// Speed the mover reports after the move.
    pub velocity_magnitude: f32,
    pub obstructed: bool,
    pub capsule_height: f32,
}

/// State that only exists between `initialize` and `teardown`.
#[derive(Debug, Clone)]
struct Runtime {
    crouch_profile: CrouchProfile,
    crouch: CrouchController,
    grounding: GroundingProbe,
    jump: JumpIntegrator,
    locomotion: LocomotionIntegrator,
    state: MovementState,
}

impl Runtime {
    fn new(crouch_profile: CrouchProfile) -> Self {
        Self {
            crouch: CrouchController::new(&crouch_profile),
            crouch_profile,
            grounding: GroundingProbe::new(),
            jump: JumpIntegrator::new(),
            locomotion: LocomotionIntegrator::new(),
            state: MovementState::Idle,
        }
    }
}

/// First-person character controller.
///
/// # Lifecycle
///
/// 1. [`new`](Self::new) validates the configuration.
/// 2. [`initialize`](Self::initialize) captures the standing pose from the
///    body and camera pivot.
/// 3. [`subscribe`](Self::subscribe) starts accepting input events.
/// 4. [`update`](Self::update) runs once per frame.
/// 5. [`teardown`](Self::teardown) stops input and drops all runtime state.
///
/// # Example
///
/// ```ignore
/// let mut controller = CharacterController::new(MovementConfig::default())?;
/// controller.initialize(&mover, &camera)?;
/// controller.subscribe();
///
/// // Whenever input changes:
/// controller.handle_event(InputEvent::Move(Vec2::new(0.0, 1.0)));
///
/// // Each frame:
/// let report = controller.update(&mut mover, &mut camera, &world, delta_time)?;
/// ```
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: MovementConfig,
    speeds: SpeedProfile,
    look: LookController,
    runtime: Option<Runtime>,
    subscribed: bool,
    queue: InputQueue,
    input: InputState,
}

impl CharacterController {
    /// Create a controller. Fails if the configuration is invalid.
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Create a controller with the default configuration.
    pub fn with_default_config() -> Self {
        Self::from_validated(MovementConfig::default())
    }

    fn from_validated(config: MovementConfig) -> Self {
        Self {
            speeds: SpeedProfile::from_config(&config),
            look: LookController::from_config(&config),
            config,
            runtime: None,
            subscribed: false,
            queue: InputQueue::new(),
            input: InputState::default(),
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// State classified by the last update.
    pub fn state(&self) -> MovementState {
        self.runtime.as_ref().map(|rt| rt.state).unwrap_or_default()
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.runtime.as_ref().map_or(0.0, |rt| rt.jump.vertical_velocity())
    }

    pub fn is_grounded(&self) -> bool {
        self.runtime.as_ref().is_some_and(|rt| rt.grounding.is_grounded())
    }

    /// Input snapshot as of the last update.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Events waiting for the next update.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Capture the standing pose and reset all runtime state.
    ///
    /// The body's current capsule is the standing capsule and the pivot's
    /// current height is the standing camera height.
    pub fn initialize(&mut self, mover: &dyn Mover, camera: &CameraPivot) -> Result<(), ControllerError> {
        let capsule = mover.capsule();
        if !capsule.is_valid() {
            return Err(ControllerError::InvalidBody(format!(
                "degenerate capsule (radius {}, height {})",
                capsule.radius, capsule.height
            )));
        }

        let profile = CrouchProfile::new(&capsule, camera.local_y, &self.config)
            .map_err(|err| ControllerError::InvalidBody(err.to_string()))?;

        self.runtime = Some(Runtime::new(profile));
        self.input = InputState::default();
        self.queue.clear();

        log::info!(
            "character controller initialized (standing height {:.2}, crouching height {:.2})",
            profile.standing.height,
            profile.crouching.height
        );
        Ok(())
    }

    /// Start accepting input events.
    pub fn subscribe(&mut self) {
        if !self.subscribed {
            log::debug!("character controller subscribed to input");
        }
        self.subscribed = true;
    }

    /// Stop accepting input and drop all runtime state.
    ///
    /// The controller must be initialized again before the next update.
    pub fn teardown(&mut self) {
        if self.subscribed || self.runtime.is_some() {
            log::debug!("character controller torn down ({} events dropped)", self.queue.len());
        }
        self.subscribed = false;
        self.queue.clear();
        self.input = InputState::default();
        self.runtime = None;
    }

    /// Queue an input event for the next update.
    pub fn handle_event(&mut self, event: InputEvent) {
        if self.subscribed {
            self.queue.push(event);
        } else {
            log::trace!("dropping {:?}: controller not subscribed", event);
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Run one frame of movement.
    ///
    /// `delta_time` is clamped to `[0, max_delta_time]`.
    pub fn update(
        &mut self,
        mover: &mut dyn Mover,
        camera: &mut CameraPivot,
        query: &dyn SpatialQuery,
        delta_time: f32,
    ) -> Result<FrameReport, ControllerError> {
        let rt = self.runtime.as_mut().ok_or(ControllerError::NotInitialized)?;
        let config = &self.config;

        // NaN becomes 0
        let delta_time = delta_time.max(0.0).min(config.max_delta_time);

        self.queue
            .drain_into(&mut self.input, config.sprint_mode, config.crouch_mode);

        let (move_axis, move_magnitude) = if config.move_enabled {
            (self.input.move_axis, self.input.move_magnitude())
        } else {
            (Vec2::ZERO, 0.0)
        };
        let sprint_input = config.sprint_enabled && self.input.sprint_active;
        let crouch_input = config.crouch_enabled && self.input.crouch_active;

        // Ground
        let filter = config.ground_filter.query_filter(mover.collider());
        let ground = rt.grounding.update(
            query,
            &mover.capsule(),
            mover.position(),
            config.ground_probe_margin,
            filter,
        );

        // Classify
        let previous = rt.state;
        rt.state = classify(
            previous,
            &ClassifierInput {
                grounded: ground.grounded,
                vertical_velocity: rt.jump.vertical_velocity(),
                crouch_input,
                obstructed: rt.crouch.is_obstructed(),
                sprint_input,
                move_magnitude,
            },
        );
        if rt.state != previous {
            log::debug!("movement state {:?} -> {:?}", previous, rt.state);
        }

        // Crouch
        camera.local_y = rt.crouch.update(
            &rt.crouch_profile,
            &CrouchFrame {
                crouch_input,
                grounded: ground.grounded,
                state: rt.state,
            },
            mover,
            query,
            filter,
            delta_time,
        );

        // Vertical
        let jumped = rt.jump.update(
            &mut self.input.jump_requested,
            JumpConditions {
                grounded: ground.grounded,
                jump_enabled: config.jump_enabled,
                crouched: rt.state == MovementState::Crouching,
            },
            config.jump_impulse(),
            config.gravity,
            config.jump_cooldown,
            delta_time,
        );
        if jumped {
            log::debug!("jump (impulse {:.2})", config.jump_impulse());
        }

        // Horizontal, merged and committed
        let velocity = rt.locomotion.velocity(
            &self.speeds,
            rt.state,
            mover.orientation(),
            move_axis,
            rt.jump.vertical_velocity(),
            delta_time,
        );
        let displacement = velocity * delta_time;
        let outcome = mover.move_by(displacement);

        // Look runs after movement
        if config.look_enabled {
            self.look.apply(self.input.look_axis, mover, camera, delta_time);
        }

        Ok(FrameReport {
            state: rt.state,
            grounded: ground.grounded,
            transition: ground.transition,
            jumped,
            speed: rt.locomotion.speed(),
            vertical_velocity: rt.jump.vertical_velocity(),
            displacement,
            outcome,
            velocity_magnitude: mover.velocity_magnitude(),
            obstructed: rt.crouch.is_obstructed(),
            capsule_height: mover.capsule().height,
        })
    }

    /// Move the body without sweeping and bring it to rest.
    ///
    /// Vertical velocity and blended speed drop to zero and the grounded
    /// signal starts over, so the next update reports landing afresh. With
    /// no target the body goes to the world origin.
    pub fn teleport(&mut self, mover: &mut dyn Mover, target: Option<Vec3>) {
        let position = target.unwrap_or_else(|| {
            log::warn!("teleport without a target, falling back to the origin");
            Vec3::ZERO
        });

        mover.set_position(position);
        if let Some(rt) = self.runtime.as_mut() {
            rt.jump.halt();
            rt.locomotion.reset();
            rt.grounding.reset();
        }
        log::debug!("teleported to {:?}", position);
    }
}

// ============================================================================
// Tests
// ============================================================================

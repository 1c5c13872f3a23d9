//! Player entity and state.

use glam::Vec3;
use stride_physics::movement::{BodyMover, CameraPivot, CapsuleShape, CharacterBody, CharacterController, FrameReport};
use stride_physics::{CollisionWorld, ControllerError, MovementConfig, MovementState};

use crate::input::{InputTranslator, PlayerInput};
use crate::level::SpawnPoint;

/// Unique identifier for entities.
pub type EntityId = u32;

/// A player in the game.
#[derive(Debug)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    /// Collider and transform.
    pub body: CharacterBody,

    /// First-person camera mount.
    pub camera: CameraPivot,

    /// Movement controller driving the body.
    pub controller: CharacterController,

    /// Raw input to controller events.
    pub translator: InputTranslator,

    /// Diagnostics from the last tick.
    pub last_report: FrameReport,
}

impl Player {
    /// Collision radius (meters).
    pub const RADIUS: f32 = 0.4;

    /// Standing capsule height (meters).
    pub const STANDING_HEIGHT: f32 = 1.8;

    /// Standing eye height (meters).
    pub const EYE_HEIGHT: f32 = 1.6;

    /// Create a player standing at `position` and get its controller ready
    /// for input.
    pub fn new(
        id: EntityId,
        name: String,
        config: MovementConfig,
        spawn: &SpawnPoint,
        position: Vec3,
        world: &CollisionWorld,
        mouse_sensitivity: f32,
    ) -> Result<Self, ControllerError> {
        let mut body = CharacterBody::new(position, CapsuleShape::standing(Self::RADIUS, Self::STANDING_HEIGHT));
        body.orientation = spawn.orientation();
        let camera = CameraPivot::new(Self::EYE_HEIGHT);

        let mut controller = CharacterController::new(config)?;
        controller.initialize(&BodyMover::new(&mut body, world, 0.0), &camera)?;
        controller.subscribe();

        Ok(Self {
            id,
            name,
            body,
            camera,
            controller,
            translator: InputTranslator::new(mouse_sensitivity),
            last_report: FrameReport::default(),
        })
    }

    /// Feed this tick's raw input and run one frame of movement.
    pub fn update(
        &mut self,
        input: &PlayerInput,
        world: &CollisionWorld,
        delta_time: f32,
    ) -> Result<FrameReport, ControllerError> {
        for event in self.translator.translate(input) {
            self.controller.handle_event(event);
        }

        let mut mover = BodyMover::new(&mut self.body, world, delta_time);
        self.last_report = self.controller.update(&mut mover, &mut self.camera, world, delta_time)?;
        Ok(self.last_report)
    }

    /// Move the player without sweeping. `None` sends them to the origin.
    pub fn teleport(&mut self, world: &CollisionWorld, target: Option<Vec3>) {
        let mut mover = BodyMover::new(&mut self.body, world, 0.0);
        self.controller.teleport(&mut mover, target);
    }

    /// Stop input and release the controller's runtime state.
    pub fn despawn(&mut self) {
        self.controller.teardown();
        self.translator.reset();
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Get the player's eye position (for camera).
    pub fn eye_position(&self) -> Vec3 {
        self.body.position + Vec3::Y * self.camera.local_y
    }

    /// Get the direction the player is looking.
    pub fn look_direction(&self) -> Vec3 {
        self.body.orientation * self.camera.rotation() * Vec3::Z
    }

    /// Get the player's forward direction (horizontal only).
    #[inline]
    pub fn forward_direction(&self) -> Vec3 {
        self.body.orientation * Vec3::Z
    }

    #[inline]
    pub fn state(&self) -> MovementState {
        self.controller.state()
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.controller.is_grounded()
    }

    /// Check if the player is crouching.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.state() == MovementState::Crouching
    }
}

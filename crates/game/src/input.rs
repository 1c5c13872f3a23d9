//! Player input handling.
//!
//! This module converts raw per-frame device state (keys held, mouse delta)
//! into the [`InputEvent`]s the character controller consumes. Buttons only
//! produce events on edges and axes only when they change.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stride_physics::movement::{InputEvent, InputPhase};

/// Raw player input for a single frame.
///
/// This is the input format received from the client input system.
/// It gets converted to [`InputEvent`]s by an [`InputTranslator`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this frame (pixels, +y is down the screen).
    pub mouse_delta: (f32, f32),

    /// Action buttons pressed.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
    pub sprint: bool,
}

impl PlayerInput {
    /// Movement axis: `x` strafes right, `y` moves forward.
    ///
    /// Diagonals are normalized so they are not faster than straight moves.
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.movement.forward {
            axis.y += 1.0;
        }
        if self.movement.backward {
            axis.y -= 1.0;
        }
        if self.movement.right {
            axis.x += 1.0;
        }
        if self.movement.left {
            axis.x -= 1.0;
        }

        if axis.length_squared() > 1.0 {
            axis.normalize()
        } else {
            axis
        }
    }

    /// Look axis: `x` turns right, `y` looks up.
    pub fn look_axis(&self, mouse_sensitivity: f32) -> Vec2 {
        Vec2::new(self.mouse_delta.0, -self.mouse_delta.1) * mouse_sensitivity
    }
}

/// Turns successive [`PlayerInput`] frames into controller events.
#[derive(Debug, Clone)]
pub struct InputTranslator {
    /// Multiplier from mouse pixels to look axis units.
    pub mouse_sensitivity: f32,
    move_axis: Vec2,
    look_axis: Vec2,
    actions: ActionInput,
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl InputTranslator {
    pub fn new(mouse_sensitivity: f32) -> Self {
        Self {
            mouse_sensitivity,
            move_axis: Vec2::ZERO,
            look_axis: Vec2::ZERO,
            actions: ActionInput::default(),
        }
    }

    /// Events describing what changed since the previous frame.
    pub fn translate(&mut self, input: &PlayerInput) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let move_axis = input.move_axis();
        if move_axis != self.move_axis {
            events.push(InputEvent::Move(move_axis));
            self.move_axis = move_axis;
        }

        let look_axis = input.look_axis(self.mouse_sensitivity);
        if look_axis != self.look_axis {
            events.push(InputEvent::Look(look_axis));
            self.look_axis = look_axis;
        }

        let previous = self.actions;
        let current = input.actions;
        if let Some(phase) = edge(previous.jump, current.jump) {
            events.push(InputEvent::Jump(phase));
        }
        if let Some(phase) = edge(previous.crouch, current.crouch) {
            events.push(InputEvent::Crouch(phase));
        }
        if let Some(phase) = edge(previous.sprint, current.sprint) {
            events.push(InputEvent::Sprint(phase));
        }
        self.actions = current;

        events
    }

    /// Forget held keys and axes, e.g. when the player is removed.
    pub fn reset(&mut self) {
        self.move_axis = Vec2::ZERO;
        self.look_axis = Vec2::ZERO;
        self.actions = ActionInput::default();
    }
}

fn edge(was: bool, is: bool) -> Option<InputPhase> {
    match (was, is) {
        (false, true) => Some(InputPhase::Started),
        (true, false) => Some(InputPhase::Canceled),
        _ => None,
    }
}

//! Input events and the per-frame input snapshot.
//!
//! Hosts deliver [`InputEvent`]s whenever their devices change. The controller
//! queues them and folds the queue into an [`InputState`] once at the start of
//! each frame:
//!
//! - axes are last-write-wins
//! - sprint and crouch latch according to their [`ActivationMode`]
//! - jump is a one-shot request that stays set until the jump integrator
//!   consumes it

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Phase of a button-like input signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputPhase {
    /// The control was just actuated.
    Started,
    /// The control passed its interaction threshold.
    Performed,
    /// The control was released.
    Canceled,
}

/// How a binary action reacts to its control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationMode {
    /// Active only while the control is held.
    #[default]
    Hold,
    /// Each press flips the action on or off.
    Toggle,
}

/// A single input sample or signal from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Movement axis. `x` strafes right, `y` moves forward.
    Move(Vec2),
    /// Look axis. `x` turns right, `y` looks up.
    Look(Vec2),
    Jump(InputPhase),
    Crouch(InputPhase),
    Sprint(InputPhase),
}

/// Input snapshot read by one frame of movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub move_axis: Vec2,
    pub look_axis: Vec2,
    pub sprint_active: bool,
    pub crouch_active: bool,
    /// Cleared by the jump integrator when a jump is performed.
    pub jump_requested: bool,
}

impl InputState {
    /// Fold one event into the snapshot.
    pub fn apply(&mut self, event: InputEvent, sprint_mode: ActivationMode, crouch_mode: ActivationMode) {
        match event {
            InputEvent::Move(axis) => self.move_axis = axis,
            InputEvent::Look(axis) => self.look_axis = axis,
            InputEvent::Jump(InputPhase::Started | InputPhase::Performed) => self.jump_requested = true,
            InputEvent::Jump(InputPhase::Canceled) => {}
            InputEvent::Sprint(phase) => latch(&mut self.sprint_active, phase, sprint_mode),
            InputEvent::Crouch(phase) => latch(&mut self.crouch_active, phase, crouch_mode),
        }
    }

    /// Magnitude of the movement axis.
    #[inline]
    pub fn move_magnitude(&self) -> f32 {
        self.move_axis.length()
    }
}

fn latch(active: &mut bool, phase: InputPhase, mode: ActivationMode) {
    match (mode, phase) {
        (ActivationMode::Hold, InputPhase::Started | InputPhase::Performed) => *active = true,
        (ActivationMode::Hold, InputPhase::Canceled) => *active = false,
        (ActivationMode::Toggle, InputPhase::Started) => *active = !*active,
        (ActivationMode::Toggle, _) => {}
    }
}

/// Events received since the last frame, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Apply every queued event to `state` and empty the queue.
    pub fn drain_into(&mut self, state: &mut InputState, sprint_mode: ActivationMode, crouch_mode: ActivationMode) {
        for event in self.events.drain(..) {
            state.apply(event, sprint_mode, crouch_mode);
        }
    }
}

//! Movement states and the classifier that picks one each frame.

use serde::{Deserialize, Serialize};

/// Vertical speed above which an airborne body counts as jumping.
pub const RISING_THRESHOLD: f32 = 0.1;

/// Move input magnitude above which a grounded body counts as walking.
pub const MOVE_THRESHOLD: f32 = 0.1;

/// The discrete locomotion state of the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    Sprinting,
    Crouching,
    Jumping,
    Falling,
}

impl MovementState {
    /// Jumping or falling.
    #[inline]
    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Jumping | Self::Falling)
    }
}

/// Everything the classifier looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierInput {
    pub grounded: bool,
    pub vertical_velocity: f32,
    pub crouch_input: bool,
    /// Overhead obstruction left by the previous crouch pass.
    pub obstructed: bool,
    pub sprint_input: bool,
    pub move_magnitude: f32,
}

/// State for an airborne body, if the vertical velocity decides one.
///
/// Between `0` and [`RISING_THRESHOLD`] neither branch applies and `None`
/// tells the caller to keep the previous state. This happens when the body
/// walks off a ledge without gaining any downward speed yet.
pub fn classify_airborne(vertical_velocity: f32) -> Option<MovementState> {
    if vertical_velocity > RISING_THRESHOLD {
        Some(MovementState::Jumping)
    } else if vertical_velocity < 0.0 {
        Some(MovementState::Falling)
    } else {
        None
    }
}

/// State for a grounded body. Crouching beats sprinting beats walking.
pub fn classify_grounded(input: &ClassifierInput) -> MovementState {
    if input.crouch_input || input.obstructed {
        MovementState::Crouching
    } else if input.sprint_input {
        MovementState::Sprinting
    } else if input.move_magnitude > MOVE_THRESHOLD {
        MovementState::Walking
    } else {
        MovementState::Idle
    }
}

/// Classify the current frame. Pure: the same inputs give the same state.
pub fn classify(previous: MovementState, input: &ClassifierInput) -> MovementState {
    if input.grounded {
        classify_grounded(input)
    } else {
        classify_airborne(input.vertical_velocity).unwrap_or(previous)
    }
}

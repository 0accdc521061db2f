use crate::scripted_input::ScriptedInputPlayer;

/// Per-tick player intent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionState {
    /// Turn input in [-1, 1], positive turns left.
    pub turn: f32,
    /// Thrust in [-1, 1], positive moves forward.
    pub accelerate: f32,
    pub quit: bool,
}

/// Where actions come from in a headless run.
pub enum InputSource {
    /// No input: the camera stays where it started.
    Idle,
    Scripted(ScriptedInputPlayer),
}

impl InputSource {
    pub fn advance(&mut self, dt: f32) -> ActionState {
        match self {
            InputSource::Idle => ActionState::default(),
            InputSource::Scripted(player) => player.advance(dt),
        }
    }
}

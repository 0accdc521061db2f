use crate::input::ActionState;
use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptedStep {
    duration: f32,
    #[serde(default)]
    turn: f32,
    #[serde(default)]
    accelerate: f32,
    #[serde(default)]
    quit: bool,
}

/// Replays a JSON list of timed input steps. The last step repeats forever.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scripted input {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid scripted input {}", path.display()))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
        })
    }

    pub fn advance(&mut self, dt: f32) -> ActionState {
        if self.steps.is_empty() {
            return ActionState::default();
        }

        self.time_in_step += dt;
        while self.index < self.steps.len() && self.time_in_step >= self.steps[self.index].duration
        {
            self.time_in_step -= self.steps[self.index].duration;
            if self.index + 1 < self.steps.len() {
                self.index += 1;
            } else {
                self.time_in_step = 0.0;
                break;
            }
        }

        let step = self.steps.get(self.index).cloned().unwrap_or_default();
        step.into_action_state()
    }
}

impl ScriptedStep {
    fn into_action_state(self) -> ActionState {
        ActionState {
            turn: self.turn,
            accelerate: self.accelerate,
            quit: self.quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "steps": [
            { "duration": 1.0, "accelerate": 1.0 },
            { "duration": 0.5, "turn": -1.0 },
            { "duration": 0.1, "quit": true }
        ]
    }"#;

    #[test]
    fn steps_play_in_order() {
        let mut player = ScriptedInputPlayer::from_json(SCRIPT).expect("script parses");

        let first = player.advance(0.5);
        assert_eq!(first.accelerate, 1.0);
        assert!(!first.quit);

        let second = player.advance(0.6);
        assert_eq!(second.turn, -1.0);
        assert_eq!(second.accelerate, 0.0);

        let last = player.advance(0.5);
        assert!(last.quit);
    }

    #[test]
    fn last_step_repeats() {
        let mut player = ScriptedInputPlayer::from_json(SCRIPT).expect("script parses");
        player.advance(10.0);
        assert!(player.advance(10.0).quit);
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(ScriptedInputPlayer::from_json(r#"{ "steps": [] }"#).is_err());
        assert!(ScriptedInputPlayer::from_json("not json").is_err());
    }
}

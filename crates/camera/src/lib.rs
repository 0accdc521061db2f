#![warn(missing_docs)]
//! Fly camera that doubles as the audio listener.
//!
//! Movement is integrated once per fixed tick: turning rotates the facing
//! direction around the world Y axis, acceleration pushes along it, and
//! friction bleeds off velocity so the camera coasts to a stop.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Per-tick movement constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Radians turned per tick at full input.
    pub turn_speed: f32,
    /// Velocity gained per tick at full input.
    pub acceleration: f32,
    /// Fraction of velocity kept after each tick (0..=1).
    pub friction: f32,
    /// Where the camera starts.
    pub start_position: [f32; 3],
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            turn_speed: 0.05,
            acceleration: 4.0,
            friction: 0.98,
            start_position: [0.0, 512.0, 0.0],
        }
    }
}

/// Camera driven by turn/accelerate input with friction.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    /// World-space position.
    pub position: Vec3,
    /// Facing direction (unit length, horizontal).
    pub forward: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Displacement applied on the next tick.
    pub velocity: Vec3,
    tuning: CameraTuning,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(CameraTuning::default())
    }
}

impl FlyCamera {
    /// Create a camera at the tuning's start position, facing -Z.
    pub fn new(tuning: CameraTuning) -> Self {
        Self {
            position: Vec3::from_array(tuning.start_position),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            velocity: Vec3::ZERO,
            tuning,
        }
    }

    /// Movement constants in use.
    pub fn tuning(&self) -> &CameraTuning {
        &self.tuning
    }

    /// Advance one tick.
    ///
    /// # Arguments
    /// * `turn` - Turn input in [-1, 1], positive turns left
    /// * `accelerate` - Thrust input in [-1, 1], positive moves forward
    pub fn update(&mut self, turn: f32, accelerate: f32) {
        let turn = turn.clamp(-1.0, 1.0) * self.tuning.turn_speed;
        if turn != 0.0 {
            self.forward = (Mat3::from_rotation_y(turn) * self.forward).normalize_or_zero();
        }

        let accel = accelerate.clamp(-1.0, 1.0) * self.tuning.acceleration;
        self.velocity += self.forward * accel;
        self.position += self.velocity;
        self.velocity *= self.tuning.friction;
    }

    /// Horizontal speed in world units per tick.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

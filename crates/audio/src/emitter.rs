//! Emitter capability and the descriptor handed to the engine.

use glam::Vec3;

/// Anything that can be the source of a 3D sound.
///
/// The manager only keeps a weak reference to an emitter, and reads it again
/// on every tick, so implementors are free to move between ticks.
pub trait Emitter {
    /// World-space position.
    fn position(&self) -> Vec3;
    /// Facing direction.
    fn forward(&self) -> Vec3;
    /// Up direction.
    fn up(&self) -> Vec3;
    /// Velocity, used for Doppler.
    fn velocity(&self) -> Vec3;
}

/// Snapshot of an emitter's kinematic state at apply time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterDescriptor {
    /// World-space position.
    pub position: Vec3,
    /// Facing direction.
    pub forward: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Velocity.
    pub velocity: Vec3,
}

impl Default for EmitterDescriptor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            velocity: Vec3::ZERO,
        }
    }
}

impl EmitterDescriptor {
    /// Stationary descriptor at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Overwrite every field from `emitter`.
    pub fn capture(&mut self, emitter: &dyn Emitter) {
        self.position = emitter.position();
        self.forward = emitter.forward();
        self.up = emitter.up();
        self.velocity = emitter.velocity();
    }
}

impl Emitter for EmitterDescriptor {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_overwrites_previous_values() {
        let mut scratch = EmitterDescriptor::at(Vec3::new(1.0, 2.0, 3.0));
        let source = EmitterDescriptor {
            position: Vec3::new(-5.0, 0.0, 9.0),
            forward: Vec3::X,
            up: Vec3::Z,
            velocity: Vec3::new(0.5, 0.0, 0.0),
        };

        scratch.capture(&source);
        assert_eq!(scratch, source);
    }
}

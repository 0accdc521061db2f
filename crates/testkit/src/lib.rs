#![warn(missing_docs)]
//! Test doubles for the audio manager: a recording playback engine, a
//! scripted resource loader, and a movable emitter.

mod fake_engine;
mod fake_loader;

use audio3d_audio::{Emitter, EmitterDescriptor};
use glam::Vec3;
use std::cell::Cell;
use std::rc::Rc;

pub use fake_engine::*;
pub use fake_loader::*;

/// Emitter whose state can be changed between ticks through a shared `Rc`.
#[derive(Debug, Default)]
pub struct TestEmitter {
    state: Cell<EmitterDescriptor>,
}

impl TestEmitter {
    /// Stationary emitter at `position`, ready to hand to `play_sound`.
    pub fn at(position: Vec3) -> Rc<Self> {
        Rc::new(Self {
            state: Cell::new(EmitterDescriptor::at(position)),
        })
    }

    /// Emitter at `position` moving with `velocity`.
    pub fn moving(position: Vec3, velocity: Vec3) -> Rc<Self> {
        let emitter = Self::at(position);
        emitter.set_velocity(velocity);
        emitter
    }

    /// Current state.
    pub fn descriptor(&self) -> EmitterDescriptor {
        self.state.get()
    }

    /// Move the emitter.
    pub fn set_position(&self, position: Vec3) {
        let mut state = self.state.get();
        state.position = position;
        self.state.set(state);
    }

    /// Change the emitter's velocity.
    pub fn set_velocity(&self, velocity: Vec3) {
        let mut state = self.state.get();
        state.velocity = velocity;
        self.state.set(state);
    }
}

impl Emitter for TestEmitter {
    fn position(&self) -> Vec3 {
        self.state.get().position
    }

    fn forward(&self) -> Vec3 {
        self.state.get().forward
    }

    fn up(&self) -> Vec3 {
        self.state.get().up
    }

    fn velocity(&self) -> Vec3 {
        self.state.get().velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitter_updates_are_visible_through_the_trait() {
        let emitter = TestEmitter::at(Vec3::ZERO);
        emitter.set_position(Vec3::new(1.0, 2.0, 3.0));
        emitter.set_velocity(Vec3::X);

        assert_eq!(Emitter::position(emitter.as_ref()), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Emitter::velocity(emitter.as_ref()), Vec3::X);
        assert_eq!(emitter.descriptor().up, Vec3::Y);
    }
}

use crate::config::Audio3dConfig;
use crate::entities::{Cat, Dog, Entity};
use crate::input::{ActionState, InputSource};
use audio3d_audio::{AudioManager, Listener, PlaybackEngine, TickSummary};
use audio3d_camera::FlyCamera;
use std::time::Duration;
use tracing::warn;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub spatialized: u64,
    pub retired: u64,
    pub orphaned: u64,
    pub entity_errors: u64,
}

impl RunStats {
    fn record(&mut self, summary: TickSummary) {
        self.ticks += 1;
        self.spatialized += summary.spatialized as u64;
        self.retired += summary.retired as u64;
        self.orphaned += summary.orphaned as u64;
    }
}

/// The demo scene: a fly camera listening to a cat and a dog.
pub struct GameWorld<E: PlaybackEngine> {
    audio: AudioManager<E>,
    camera: FlyCamera,
    input: InputSource,
    entities: Vec<Entity>,
    tick_duration: Duration,
    stats: RunStats,
}

impl<E: PlaybackEngine> GameWorld<E> {
    pub fn new(audio: AudioManager<E>, input: InputSource, config: &Audio3dConfig) -> Self {
        Self {
            audio,
            camera: FlyCamera::new(config.camera),
            input,
            entities: vec![Entity::Cat(Cat::new(config.seed)), Entity::Dog(Dog::new())],
            tick_duration: config.tick_duration(),
            stats: RunStats::default(),
        }
    }

    pub fn audio(&self) -> &AudioManager<E> {
        &self.audio
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Run one fixed tick. Returns the actions read this tick.
    pub fn step(&mut self) -> ActionState {
        let dt = self.tick_duration.as_secs_f32();
        self.audio.engine_mut().update(self.tick_duration);

        let actions = self.input.advance(dt);
        self.camera.update(actions.turn, actions.accelerate);
        self.audio.set_listener(Listener {
            position: self.camera.position,
            forward: self.camera.forward,
            up: self.camera.up,
            velocity: self.camera.velocity,
        });

        let summary = self.audio.tick();
        self.stats.record(summary);

        for entity in &mut self.entities {
            if let Err(err) = entity.update(dt, &mut self.audio) {
                self.stats.entity_errors += 1;
                warn!(entity = entity.name(), %err, "Entity failed to play a sound");
            }
        }

        actions
    }

    /// Stop every sound and release the catalog.
    pub fn shutdown(self) -> RunStats {
        self.audio.shutdown();
        self.stats
    }
}

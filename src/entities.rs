//! Scene entities that emit 3D sounds.

use audio3d_audio::{
    AudioError, AudioManager, Emitter, EmitterDescriptor, PlaybackEngine, SoundHandle,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

const CAT_RADIUS: f32 = 6000.0;
const CAT_SOUND_INTERVAL: f32 = 1.25;
const CAT_SOUNDS: [&str; 3] = ["CatSound0", "CatSound1", "CatSound2"];

const DOG_POSITION: Vec3 = Vec3::new(0.0, 0.0, -4000.0);
const DOG_BARK_SECONDS: f32 = 6.0;
const DOG_QUIET_SECONDS: f32 = 4.0;

/// Kinematic state shared with the audio manager.
///
/// The manager holds a weak reference and reads it once per tick; the
/// entity overwrites it in place when it moves.
#[derive(Debug, Default)]
pub struct Body {
    state: Cell<EmitterDescriptor>,
}

impl Body {
    fn at(position: Vec3) -> Rc<Self> {
        Rc::new(Self {
            state: Cell::new(EmitterDescriptor::at(position)),
        })
    }

    fn set(&self, state: EmitterDescriptor) {
        self.state.set(state);
    }

    pub fn state(&self) -> EmitterDescriptor {
        self.state.get()
    }
}

impl Emitter for Body {
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

/// Circles the origin and meows at random every 1.25 seconds.
pub struct Cat {
    body: Rc<Body>,
    elapsed: f64,
    delay: f32,
    rng: StdRng,
}

impl Cat {
    pub fn new(seed: u64) -> Self {
        Self {
            body: Body::at(Self::orbit_position(0.0)),
            elapsed: 0.0,
            delay: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn orbit_position(time: f64) -> Vec3 {
        Vec3::new(-time.cos() as f32, 0.0, -time.sin() as f32) * CAT_RADIUS
    }

    fn update<E: PlaybackEngine>(
        &mut self,
        dt: f32,
        audio: &mut AudioManager<E>,
    ) -> Result<(), AudioError> {
        self.elapsed += f64::from(dt);
        let position = Self::orbit_position(self.elapsed);
        // Displacement over one tick, not per second.
        let velocity = position - self.body.position();
        let forward = if velocity == Vec3::ZERO {
            Vec3::NEG_Z
        } else {
            velocity.normalize()
        };
        self.body.set(EmitterDescriptor {
            position,
            forward,
            up: Vec3::Y,
            velocity,
        });

        self.delay -= dt;
        if self.delay < 0.0 {
            let name = CAT_SOUNDS[self.rng.gen_range(0..CAT_SOUNDS.len())];
            audio.play_sound(name, false, &self.body)?;
            self.delay += CAT_SOUND_INTERVAL;
        }
        Ok(())
    }
}

/// Sits still and barks in a loop: six seconds on, four seconds off.
pub struct Dog {
    body: Rc<Body>,
    delay: f32,
    active: Option<SoundHandle>,
}

impl Default for Dog {
    fn default() -> Self {
        Self::new()
    }
}

impl Dog {
    pub fn new() -> Self {
        Self {
            body: Body::at(DOG_POSITION),
            delay: 0.0,
            active: None,
        }
    }

    fn update<E: PlaybackEngine>(
        &mut self,
        dt: f32,
        audio: &mut AudioManager<E>,
    ) -> Result<(), AudioError> {
        self.delay -= dt;
        if self.delay >= 0.0 {
            return Ok(());
        }

        match self.active.take() {
            None => {
                self.active = Some(audio.play_sound("DogSound", true, &self.body)?);
                self.delay += DOG_BARK_SECONDS;
            }
            Some(handle) => {
                if !audio.stop(handle, false) {
                    debug!(%handle, "Dog sound already retired");
                }
                self.delay += DOG_QUIET_SECONDS;
            }
        }
        Ok(())
    }
}

/// Every kind of entity in the scene.
pub enum Entity {
    Cat(Cat),
    Dog(Dog),
}

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Cat(_) => "cat",
            Entity::Dog(_) => "dog",
        }
    }

    pub fn body(&self) -> &Rc<Body> {
        match self {
            Entity::Cat(cat) => &cat.body,
            Entity::Dog(dog) => &dog.body,
        }
    }

    /// Move the entity and let it start or stop sounds.
    pub fn update<E: PlaybackEngine>(
        &mut self,
        dt: f32,
        audio: &mut AudioManager<E>,
    ) -> Result<(), AudioError> {
        match self {
            Entity::Cat(cat) => cat.update(dt, audio),
            Entity::Dog(dog) => dog.update(dt, audio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audio3d_audio::SpatialSettings;
    use audio3d_testkit::{EngineCall, FakeEngine, FakeLoader};

    const DT: f32 = 1.0 / 60.0;
    const SOUNDS: [&str; 4] = ["CatSound0", "CatSound1", "CatSound2", "DogSound"];

    fn manager() -> AudioManager<FakeEngine> {
        let mut loader = FakeLoader::with_sounds(SOUNDS);
        AudioManager::initialize(
            FakeEngine::new(),
            &mut loader,
            &SOUNDS,
            SpatialSettings::new(2000.0, 0.1),
        )
        .expect("catalog loads")
    }

    fn created(audio: &AudioManager<FakeEngine>) -> Vec<String> {
        audio
            .engine()
            .log()
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Create { sound, .. } => Some(sound),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cat_stays_on_its_orbit() {
        let mut audio = manager();
        let mut cat = Entity::Cat(Cat::new(7));

        for _ in 0..600 {
            cat.update(DT, &mut audio).expect("cat update");
            let state = cat.body().state();
            assert!((state.position.length() - CAT_RADIUS).abs() < 1.0);
            assert!((state.forward.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cat_velocity_is_per_tick_displacement() {
        let mut audio = manager();
        let mut cat = Cat::new(7);
        let before = cat.body.position();

        cat.update(DT, &mut audio).expect("cat update");
        let state = cat.body.state();
        assert_eq!(state.velocity, state.position - before);
        // Roughly radius * angular step.
        assert!((state.velocity.length() - CAT_RADIUS * DT).abs() < 1.0);
    }

    #[test]
    fn cat_meows_every_interval() {
        let mut audio = manager();
        let mut cat = Entity::Cat(Cat::new(1));

        // Just under 5 seconds: meows near t=0, 1.25, 2.5 and 3.75.
        for _ in 0..(5 * 60 - 1) {
            cat.update(DT, &mut audio).expect("cat update");
        }

        let sounds = created(&audio);
        assert_eq!(sounds.len(), 4);
        assert!(sounds.iter().all(|name| name.starts_with("CatSound")));
        assert!(audio
            .active_handles()
            .all(|handle| !audio.engine().is_looping(handle)));
    }

    #[test]
    fn cat_sound_choice_is_deterministic_per_seed() {
        let run = |seed| {
            let mut audio = manager();
            let mut cat = Cat::new(seed);
            for _ in 0..(20 * 60) {
                cat.update(DT, &mut audio).expect("cat update");
            }
            created(&audio)
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    fn dog_barks_six_seconds_then_rests_four() {
        let mut audio = manager();
        let mut dog = Dog::new();

        dog.update(DT, &mut audio).expect("dog update");
        let first = dog.active.expect("dog starts barking at once");
        assert!(audio.engine().is_looping(first));
        assert_eq!(dog.body.position(), DOG_POSITION);

        // Just under six seconds later the loop is still running.
        for _ in 0..358 {
            dog.update(DT, &mut audio).expect("dog update");
        }
        assert_eq!(dog.active, Some(first));
        assert_eq!(audio.engine().log().stop_count(first), 0);

        for _ in 0..4 {
            dog.update(DT, &mut audio).expect("dog update");
        }
        assert_eq!(dog.active, None);
        assert!(audio.engine().log().calls().contains(&EngineCall::Stop {
            handle: first,
            immediate: false
        }));

        for _ in 0..(4 * 60) {
            dog.update(DT, &mut audio).expect("dog update");
        }
        let second = dog.active.expect("dog barks again");
        assert_ne!(first, second);
    }

    #[test]
    fn dog_tolerates_a_sound_that_already_ended() {
        let mut audio = manager();
        let mut dog = Dog::new();
        dog.update(DT, &mut audio).expect("dog update");
        let handle = dog.active.expect("barking");

        audio.engine_mut().finish(handle);
        audio.tick();
        assert!(!audio.is_active(handle));

        for _ in 0..(7 * 60) {
            dog.update(DT, &mut audio).expect("dog update");
        }
        assert_eq!(dog.active, None);
        assert_eq!(audio.engine().log().stop_count(handle), 0);
    }
}

//! Property-based tests for the active sound registry
//!
//! Random sequences of plays, stops, natural endings, dropped emitters and
//! ticks are replayed against the manager and a small model of it.
//! Validates:
//! - The registry holds exactly the played handles not yet seen stopped by a tick
//! - Every retired handle is released exactly once
//! - `stop` accepts only registered handles

use audio3d_audio::{AudioManager, SoundHandle, SpatialSettings};
use audio3d_testkit::{FakeEngine, FakeLoader, TestEmitter};
use glam::Vec3;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

const SOUNDS: [&str; 3] = ["A", "B", "C"];
const EMITTER_SLOTS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Play { sound: usize, looped: bool, slot: usize },
    Finish(usize),
    Stop { pick: usize, immediate: bool },
    FlushStops,
    DropEmitter(usize),
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..SOUNDS.len(), any::<bool>(), 0..EMITTER_SLOTS)
            .prop_map(|(sound, looped, slot)| Op::Play { sound, looped, slot }),
        2 => any::<usize>().prop_map(Op::Finish),
        1 => (any::<usize>(), any::<bool>()).prop_map(|(pick, immediate)| Op::Stop { pick, immediate }),
        1 => Just(Op::FlushStops),
        1 => (0..EMITTER_SLOTS).prop_map(Op::DropEmitter),
        3 => Just(Op::Tick),
    ]
}

/// What the manager and engine should look like, tracked independently.
#[derive(Default)]
struct Model {
    registered: BTreeSet<SoundHandle>,
    stopped: BTreeSet<SoundHandle>,
    pending: BTreeSet<SoundHandle>,
    orphaned: BTreeSet<SoundHandle>,
    slot_of: HashMap<SoundHandle, usize>,
    retired: Vec<SoundHandle>,
}

impl Model {
    fn pick(&self, index: usize) -> Option<SoundHandle> {
        if self.registered.is_empty() {
            return None;
        }
        self.registered
            .iter()
            .nth(index % self.registered.len())
            .copied()
    }

    fn tick(&mut self) {
        let registered: Vec<_> = self.registered.iter().copied().collect();
        for handle in registered {
            if self.stopped.contains(&handle) {
                self.registered.remove(&handle);
                self.pending.remove(&handle);
                self.retired.push(handle);
            } else if self.orphaned.contains(&handle) {
                self.stopped.insert(handle);
            }
        }
    }
}

fn sorted(handles: impl Iterator<Item = SoundHandle>) -> BTreeSet<SoundHandle> {
    handles.collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: the registry always matches the model, and reclamation
    /// releases every finished handle exactly once.
    #[test]
    fn registry_matches_model(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut loader = FakeLoader::with_sounds(SOUNDS);
        let mut manager = AudioManager::initialize(
            FakeEngine::new(),
            &mut loader,
            &SOUNDS,
            SpatialSettings::default(),
        )
        .expect("catalog loads");

        let mut emitters: Vec<Option<Rc<TestEmitter>>> = vec![None; EMITTER_SLOTS];
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Play { sound, looped, slot } => {
                    let emitter = emitters[slot]
                        .get_or_insert_with(|| TestEmitter::at(Vec3::new(slot as f32, 0.0, -1.0)))
                        .clone();
                    let handle = manager
                        .play_sound(SOUNDS[sound], looped, &emitter)
                        .expect("sound is loaded");
                    prop_assert!(model.registered.insert(handle), "handle {} reused", handle);
                    model.slot_of.insert(handle, slot);
                }
                Op::Finish(index) => {
                    if let Some(handle) = model.pick(index) {
                        manager.engine_mut().finish(handle);
                        model.stopped.insert(handle);
                    }
                }
                Op::Stop { pick, immediate } => {
                    let Some(handle) = model.pick(pick) else { continue };
                    prop_assert!(manager.stop(handle, immediate));
                    if immediate {
                        model.stopped.insert(handle);
                    } else {
                        model.pending.insert(handle);
                    }
                }
                Op::FlushStops => {
                    manager.engine_mut().flush_stops();
                    let pending = std::mem::take(&mut model.pending);
                    model.stopped.extend(pending);
                }
                Op::DropEmitter(slot) => {
                    if emitters[slot].take().is_some() {
                        for (&handle, &owner) in &model.slot_of {
                            if owner == slot && model.registered.contains(&handle) {
                                model.orphaned.insert(handle);
                            }
                        }
                        model.slot_of.retain(|_, owner| *owner != slot);
                    }
                }
                Op::Tick => {
                    let summary = manager.tick();
                    let expected_retired = model
                        .registered
                        .iter()
                        .filter(|handle| model.stopped.contains(handle))
                        .count();
                    model.tick();
                    prop_assert_eq!(summary.retired, expected_retired);
                }
            }

            prop_assert_eq!(sorted(manager.active_handles()), model.registered.clone());
            prop_assert_eq!(manager.active_count(), model.registered.len());
        }

        for handle in &model.retired {
            prop_assert_eq!(manager.engine().log().release_count(*handle), 1);
            prop_assert!(!manager.stop(*handle, true));
        }
        for handle in &model.registered {
            prop_assert_eq!(manager.engine().log().release_count(*handle), 0);
        }
    }

    /// Property: ticking twice with nothing changed in between is a no-op
    /// for the registry.
    #[test]
    fn repeated_tick_is_stable(plays in prop::collection::vec((0..SOUNDS.len(), any::<bool>()), 0..16)) {
        let mut loader = FakeLoader::with_sounds(SOUNDS);
        let mut manager = AudioManager::initialize(
            FakeEngine::new(),
            &mut loader,
            &SOUNDS,
            SpatialSettings::default(),
        )
        .expect("catalog loads");
        let emitter = TestEmitter::at(Vec3::new(4.0, 0.0, 0.0));

        for (sound, looped) in plays {
            manager.play_sound(SOUNDS[sound], looped, &emitter).expect("sound is loaded");
        }

        let first = manager.tick();
        let handles = sorted(manager.active_handles());
        let second = manager.tick();

        prop_assert_eq!(first, second);
        prop_assert_eq!(sorted(manager.active_handles()), handles);
        prop_assert_eq!(manager.engine().log().releases(), 0);
    }
}

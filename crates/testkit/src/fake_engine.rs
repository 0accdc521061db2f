//! Recording playback engine.
//!
//! Every call is logged as an [`EngineCall`] in a shared [`CallLog`]. Instances stay `Playing` until
//! a test finishes them with [`FakeEngine::finish`], an immediate stop, or a
//! graceful stop followed by [`FakeEngine::flush_stops`].

use audio3d_audio::spatial::{self, SpatialParams};
use audio3d_audio::{
    AudioError, EmitterDescriptor, Listener, PlaybackEngine, PlaybackState, SoundHandle,
    SpatialSettings,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Waveform handed out by [`FakeLoader`](crate::FakeLoader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWaveform {
    /// Identifier it was loaded under.
    pub name: String,
}

/// One call received by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `set_distance_scale`
    SetDistanceScale(f32),
    /// `set_doppler_scale`
    SetDopplerScale(f32),
    /// `create_instance`
    Create {
        /// Handle allocated for the instance.
        handle: SoundHandle,
        /// Waveform it was created from.
        sound: String,
    },
    /// `set_looping`
    SetLooping {
        /// Target instance.
        handle: SoundHandle,
        /// Requested flag.
        looping: bool,
    },
    /// `play`
    Play(SoundHandle),
    /// `stop`
    Stop {
        /// Target instance.
        handle: SoundHandle,
        /// Whether the stop was immediate.
        immediate: bool,
    },
    /// `apply_3d`
    Apply3d {
        /// Target instance.
        handle: SoundHandle,
        /// Listener passed in.
        listener: Listener,
        /// Emitter snapshot passed in.
        emitter: EmitterDescriptor,
    },
    /// `release`
    Release(SoundHandle),
    /// `unload`
    Unload(String),
}

/// Call journal shared between a [`FakeEngine`] and the test holding a clone.
///
/// Every clone sees the same calls, so the journal stays readable after the
/// engine has been moved into a manager and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<EngineCall>>>,
}

impl CallLog {
    fn push(&self, call: EngineCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    /// Forget the recorded calls.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Emitter snapshots passed to `apply_3d` for `handle`, in order.
    pub fn applied(&self, handle: SoundHandle) -> Vec<EmitterDescriptor> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Apply3d {
                    handle: h, emitter, ..
                } if *h == handle => Some(*emitter),
                _ => None,
            })
            .collect()
    }

    /// Number of `apply_3d` calls for any instance.
    pub fn apply_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Apply3d { .. }))
    }

    /// How many times `handle` was released.
    pub fn release_count(&self, handle: SoundHandle) -> usize {
        self.count(|call| matches!(call, EngineCall::Release(h) if *h == handle))
    }

    /// Total number of `release` calls.
    pub fn releases(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Release(_)))
    }

    /// How many stop requests `handle` received.
    pub fn stop_count(&self, handle: SoundHandle) -> usize {
        self.count(|call| matches!(call, EngineCall::Stop { handle: h, .. } if *h == handle))
    }

    /// Names of waveforms handed back through `unload`, sorted.
    pub fn unloaded(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Unload(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        names.sort();
        names
    }

    fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }
}

#[derive(Debug)]
struct Instance {
    state: PlaybackState,
    stop_pending: bool,
    looping: bool,
    params: Option<SpatialParams>,
}

/// Playback engine double that records calls and lets tests drive state.
#[derive(Debug, Default)]
pub struct FakeEngine {
    settings: SpatialSettings,
    next_handle: u64,
    instances: HashMap<SoundHandle, Instance>,
    log: CallLog,
    fail_next_create: bool,
}

impl FakeEngine {
    /// Fresh engine with no instances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_instance` fail with [`AudioError::Engine`].
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    /// Report `handle` as stopped from now on (natural end of a one-shot).
    pub fn finish(&mut self, handle: SoundHandle) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            instance.state = PlaybackState::Stopped;
        }
    }

    /// Let every pending graceful stop take effect.
    pub fn flush_stops(&mut self) {
        for instance in self.instances.values_mut() {
            if instance.stop_pending {
                instance.state = PlaybackState::Stopped;
                instance.stop_pending = false;
            }
        }
    }

    /// Shared log of every call received.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Parameters computed by the last `apply_3d` for `handle`.
    pub fn last_params(&self, handle: SoundHandle) -> Option<SpatialParams> {
        self.instances.get(&handle).and_then(|instance| instance.params)
    }

    /// Looping flag set on `handle`.
    pub fn is_looping(&self, handle: SoundHandle) -> bool {
        self.instances
            .get(&handle)
            .map(|instance| instance.looping)
            .unwrap_or(false)
    }

    /// Instances created and not yet released.
    pub fn live_instances(&self) -> usize {
        self.instances.len()
    }

    /// Tuning received from the manager.
    pub fn settings(&self) -> &SpatialSettings {
        &self.settings
    }
}

impl PlaybackEngine for FakeEngine {
    type Waveform = FakeWaveform;

    fn set_distance_scale(&mut self, scale: f32) {
        self.settings.distance_scale = scale;
        self.log.push(EngineCall::SetDistanceScale(scale));
    }

    fn set_doppler_scale(&mut self, scale: f32) {
        self.settings.doppler_scale = scale;
        self.log.push(EngineCall::SetDopplerScale(scale));
    }

    fn create_instance(&mut self, waveform: &FakeWaveform) -> Result<SoundHandle, AudioError> {
        if std::mem::take(&mut self.fail_next_create) {
            return Err(AudioError::Engine("no free voices".into()));
        }

        let handle = SoundHandle::new(self.next_handle);
        self.next_handle += 1;
        self.instances.insert(
            handle,
            Instance {
                state: PlaybackState::Playing,
                stop_pending: false,
                looping: false,
                params: None,
            },
        );
        self.log.push(EngineCall::Create {
            handle,
            sound: waveform.name.clone(),
        });
        Ok(handle)
    }

    fn set_looping(&mut self, handle: SoundHandle, looping: bool) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            instance.looping = looping;
        }
        self.log.push(EngineCall::SetLooping { handle, looping });
    }

    fn play(&mut self, handle: SoundHandle) {
        self.log.push(EngineCall::Play(handle));
    }

    fn stop(&mut self, handle: SoundHandle, immediate: bool) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            if immediate {
                instance.state = PlaybackState::Stopped;
            } else {
                instance.stop_pending = true;
            }
        }
        self.log.push(EngineCall::Stop { handle, immediate });
    }

    fn state(&self, handle: SoundHandle) -> PlaybackState {
        self.instances
            .get(&handle)
            .map(|instance| instance.state)
            .unwrap_or(PlaybackState::Stopped)
    }

    fn apply_3d(&mut self, handle: SoundHandle, listener: &Listener, emitter: &EmitterDescriptor) {
        let params = spatial::compute(listener, emitter, &self.settings);
        if let Some(instance) = self.instances.get_mut(&handle) {
            instance.params = Some(params);
        }
        self.log.push(EngineCall::Apply3d {
            handle,
            listener: *listener,
            emitter: *emitter,
        });
    }

    fn release(&mut self, handle: SoundHandle) {
        self.instances.remove(&handle);
        self.log.push(EngineCall::Release(handle));
    }

    fn unload(&mut self, waveform: FakeWaveform) {
        self.log.push(EngineCall::Unload(waveform.name));
    }
}

//! Collaborator traits: the playback engine and the resource loader.

use crate::{AudioResult, EmitterDescriptor, Listener};
use std::fmt;
use std::time::Duration;

/// Handle to a single playback instance, allocated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundHandle(u64);

impl SoundHandle {
    /// Wrap a raw engine-side identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound#{}", self.0)
    }
}

/// Playback state reported by the engine.
///
/// `Stopped` is terminal: once reported for a handle it never changes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Created or audible.
    Playing,
    /// Finished or stopped; resources can be reclaimed.
    Stopped,
}

/// Playback backend driven by the [`AudioManager`](crate::AudioManager).
///
/// All calls are synchronous. A backend may mix on its own thread, but the
/// state it reports must become [`PlaybackState::Stopped`] monotonically
/// after [`stop`](Self::stop) or once a one-shot sound has finished.
pub trait PlaybackEngine {
    /// Loaded, shareable sound data.
    type Waveform;

    /// Set how quickly sounds attenuate with distance (> 0).
    fn set_distance_scale(&mut self, scale: f32);

    /// Set how strongly relative velocity shifts pitch (>= 0).
    fn set_doppler_scale(&mut self, scale: f32);

    /// Create a new, not yet playing instance of `waveform`.
    fn create_instance(&mut self, waveform: &Self::Waveform) -> AudioResult<SoundHandle>;

    /// Set whether the instance loops. Called before [`play`](Self::play).
    fn set_looping(&mut self, handle: SoundHandle, looping: bool);

    /// Start playback.
    fn play(&mut self, handle: SoundHandle);

    /// Request a stop. `immediate = false` lets the backend finish gracefully.
    fn stop(&mut self, handle: SoundHandle, immediate: bool);

    /// Current state. Unknown handles report [`PlaybackState::Stopped`].
    fn state(&self, handle: SoundHandle) -> PlaybackState;

    /// Apply listener-relative 3D parameters.
    fn apply_3d(&mut self, handle: SoundHandle, listener: &Listener, emitter: &EmitterDescriptor);

    /// Free the instance. Called exactly once per handle.
    fn release(&mut self, handle: SoundHandle);

    /// Take back a catalog waveform at shutdown.
    fn unload(&mut self, waveform: Self::Waveform) {
        drop(waveform);
    }

    /// Backend housekeeping, pumped by the tick driver before each tick.
    fn update(&mut self, _elapsed: Duration) {}
}

/// Resolves sound identifiers into waveforms at initialization.
pub trait ResourceLoader {
    /// Waveform type produced, matching the engine's.
    type Waveform;

    /// Load the waveform named `name`.
    fn load(&mut self, name: &str) -> anyhow::Result<Self::Waveform>;
}

//! Device-free playback engine driven by an explicit clock.
//!
//! Instances advance only when [`PlaybackEngine::update`] is pumped, which
//! makes headless runs deterministic. A graceful stop lands on the next
//! update, so callers see the same one-tick latency a real mixer has.

use super::HandleAllocator;
use crate::spatial::{self, SpatialParams};
use crate::{
    AudioError, EmitterDescriptor, Listener, PlaybackEngine, PlaybackState, ResourceLoader,
    SoundHandle, SpatialSettings,
};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Waveform stand-in: only the length matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedClip {
    /// How long one pass of the clip plays.
    pub duration: Duration,
}

#[derive(Debug)]
struct Voice {
    duration: Duration,
    position: Duration,
    looping: bool,
    started: bool,
    stop_pending: bool,
    stopped: bool,
    params: SpatialParams,
}

/// Playback engine that simulates clip lengths instead of producing sound.
#[derive(Debug, Default)]
pub struct SimulatedEngine {
    settings: SpatialSettings,
    handles: HandleAllocator,
    voices: HashMap<SoundHandle, Voice>,
}

impl SimulatedEngine {
    /// Create an engine with default tuning (overwritten at manager init).
    pub fn new() -> Self {
        Self::default()
    }

    /// Tuning currently applied.
    pub fn settings(&self) -> &SpatialSettings {
        &self.settings
    }

    /// Last parameters computed for `handle`.
    pub fn params(&self, handle: SoundHandle) -> Option<SpatialParams> {
        self.voices.get(&handle).map(|voice| voice.params)
    }

    /// Playback position of `handle` within its clip.
    pub fn position(&self, handle: SoundHandle) -> Option<Duration> {
        self.voices.get(&handle).map(|voice| voice.position)
    }

    /// Instances created and not yet released.
    pub fn live_instances(&self) -> usize {
        self.voices.len()
    }
}

impl PlaybackEngine for SimulatedEngine {
    type Waveform = SimulatedClip;

    fn set_distance_scale(&mut self, scale: f32) {
        self.settings.distance_scale = scale;
    }

    fn set_doppler_scale(&mut self, scale: f32) {
        self.settings.doppler_scale = scale;
    }

    fn create_instance(&mut self, waveform: &SimulatedClip) -> Result<SoundHandle, AudioError> {
        let handle = self.handles.next();
        self.voices.insert(
            handle,
            Voice {
                duration: waveform.duration,
                position: Duration::ZERO,
                looping: false,
                started: false,
                stop_pending: false,
                stopped: false,
                params: SpatialParams::default(),
            },
        );
        Ok(handle)
    }

    fn set_looping(&mut self, handle: SoundHandle, looping: bool) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            voice.looping = looping;
        }
    }

    fn play(&mut self, handle: SoundHandle) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            voice.started = true;
        }
    }

    fn stop(&mut self, handle: SoundHandle, immediate: bool) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            if immediate {
                voice.stopped = true;
            } else {
                voice.stop_pending = true;
            }
        }
    }

    fn state(&self, handle: SoundHandle) -> PlaybackState {
        match self.voices.get(&handle) {
            Some(voice) if !voice.stopped => PlaybackState::Playing,
            _ => PlaybackState::Stopped,
        }
    }

    fn apply_3d(&mut self, handle: SoundHandle, listener: &Listener, emitter: &EmitterDescriptor) {
        let settings = self.settings;
        if let Some(voice) = self.voices.get_mut(&handle) {
            voice.params = spatial::compute(listener, emitter, &settings);
        }
    }

    fn release(&mut self, handle: SoundHandle) {
        if self.voices.remove(&handle).is_none() {
            debug!(%handle, "Release of unknown simulated voice");
        }
    }

    fn update(&mut self, elapsed: Duration) {
        for voice in self.voices.values_mut() {
            if !voice.started || voice.stopped {
                continue;
            }
            if voice.stop_pending {
                voice.stopped = true;
                continue;
            }

            voice.position += elapsed;
            if voice.position >= voice.duration {
                if voice.looping && !voice.duration.is_zero() {
                    let nanos = voice.position.as_nanos() % voice.duration.as_nanos();
                    voice.position = Duration::from_nanos(nanos as u64);
                } else {
                    voice.position = voice.duration;
                    voice.stopped = true;
                }
            }
        }
    }
}

/// Loader for [`SimulatedEngine`]: maps identifiers to clip lengths.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLoader {
    clips: HashMap<String, Duration>,
}

impl SimulatedLoader {
    /// Loader knowing every `(name, duration)` pair.
    pub fn new<I, S>(clips: I) -> Self
    where
        I: IntoIterator<Item = (S, Duration)>,
        S: Into<String>,
    {
        Self {
            clips: clips
                .into_iter()
                .map(|(name, duration)| (name.into(), duration))
                .collect(),
        }
    }
}

impl ResourceLoader for SimulatedLoader {
    type Waveform = SimulatedClip;

    fn load(&mut self, name: &str) -> Result<SimulatedClip> {
        self.clips
            .get(name)
            .map(|&duration| SimulatedClip { duration })
            .ok_or_else(|| anyhow!("no simulated clip registered for `{name}`"))
    }
}

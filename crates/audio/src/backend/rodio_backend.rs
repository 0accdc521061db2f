//! Rodio playback backend.
//!
//! Each instance is a [`SpatialSink`]. World positions are divided by the
//! distance scale before they reach rodio, which does its own panning and
//! distance attenuation; Doppler pitch is applied through the sink speed.

use super::{EncodedSound, HandleAllocator};
use crate::spatial;
use crate::{
    AudioError, EmitterDescriptor, Listener, PlaybackEngine, PlaybackState, SoundHandle,
    SpatialSettings,
};
use anyhow::Context;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Source, SpatialSink};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

/// Half the distance between the listener's ears, in distance-scale units.
const EAR_OFFSET: f32 = 0.1;

struct Voice {
    sink: SpatialSink,
    data: Arc<[u8]>,
    looping: bool,
    started: bool,
    stop_requested: bool,
}

/// Rodio-based playback engine.
pub struct RodioEngine {
    /// Output stream (must be kept alive)
    _stream: OutputStream,
    /// Stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    settings: SpatialSettings,
    handles: HandleAllocator,
    voices: HashMap<SoundHandle, Voice>,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn new() -> anyhow::Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().context("Failed to create audio output stream")?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            settings: SpatialSettings::default(),
            handles: HandleAllocator::default(),
            voices: HashMap::new(),
        })
    }

    fn scaled(&self, position: glam::Vec3) -> [f32; 3] {
        (position / self.settings.distance_scale).to_array()
    }

    fn start(voice: &mut Voice) -> anyhow::Result<()> {
        let source = Decoder::new(Cursor::new(Arc::clone(&voice.data)))
            .context("Failed to decode audio")?;
        if voice.looping {
            voice.sink.append(source.repeat_infinite());
        } else {
            voice.sink.append(source);
        }
        voice.sink.play();
        voice.started = true;
        Ok(())
    }
}

impl PlaybackEngine for RodioEngine {
    type Waveform = EncodedSound;

    fn set_distance_scale(&mut self, scale: f32) {
        self.settings.distance_scale = scale;
    }

    fn set_doppler_scale(&mut self, scale: f32) {
        self.settings.doppler_scale = scale;
    }

    fn create_instance(&mut self, waveform: &EncodedSound) -> Result<SoundHandle, AudioError> {
        let left_ear = [-EAR_OFFSET, 0.0, 0.0];
        let right_ear = [EAR_OFFSET, 0.0, 0.0];
        let sink = SpatialSink::try_new(&self.stream_handle, [0.0; 3], left_ear, right_ear)
            .map_err(|err| AudioError::Engine(format!("Failed to create audio sink: {err}")))?;
        sink.pause();

        let handle = self.handles.next();
        self.voices.insert(
            handle,
            Voice {
                sink,
                data: waveform.shared(),
                looping: false,
                started: false,
                stop_requested: false,
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
        let Some(voice) = self.voices.get_mut(&handle) else {
            return;
        };
        if voice.started {
            voice.sink.play();
            return;
        }
        if let Err(err) = Self::start(voice) {
            warn!(%handle, "Failed to start sound: {err:#}");
            voice.stop_requested = true;
        }
    }

    fn stop(&mut self, handle: SoundHandle, _immediate: bool) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            voice.sink.stop();
            voice.stop_requested = true;
        }
    }

    fn state(&self, handle: SoundHandle) -> PlaybackState {
        match self.voices.get(&handle) {
            Some(voice) if voice.stop_requested => PlaybackState::Stopped,
            Some(voice) if voice.started && voice.sink.empty() => PlaybackState::Stopped,
            Some(_) => PlaybackState::Playing,
            None => PlaybackState::Stopped,
        }
    }

    fn apply_3d(&mut self, handle: SoundHandle, listener: &Listener, emitter: &EmitterDescriptor) {
        let params = spatial::compute(listener, emitter, &self.settings);
        let right = listener.right() * EAR_OFFSET * self.settings.distance_scale;
        let emitter_position = self.scaled(emitter.position);
        let left_ear = self.scaled(listener.position - right);
        let right_ear = self.scaled(listener.position + right);

        if let Some(voice) = self.voices.get(&handle) {
            voice.sink.set_emitter_position(emitter_position);
            voice.sink.set_left_ear_position(left_ear);
            voice.sink.set_right_ear_position(right_ear);
            voice.sink.set_speed(params.pitch);
        }
    }

    fn release(&mut self, handle: SoundHandle) {
        match self.voices.remove(&handle) {
            Some(voice) => voice.sink.stop(),
            None => debug!(%handle, "Release of unknown rodio voice"),
        }
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        for (_, voice) in self.voices.drain() {
            voice.sink.stop();
        }
    }
}

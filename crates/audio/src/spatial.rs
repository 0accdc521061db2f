//! Listener-relative parameter model.
//!
//! Turns a listener and an emitter snapshot into the gain, pan, and pitch a
//! backend feeds its mixer. Backends that do their own spatialization (rodio's
//! spatial sink) still use the Doppler pitch from here.

use crate::{EmitterDescriptor, Listener, SpatialSettings};

/// Pitch never shifts more than one octave either way.
pub const MIN_PITCH: f32 = 0.5;
/// See [`MIN_PITCH`].
pub const MAX_PITCH: f32 = 2.0;

const CO_LOCATED_EPSILON: f32 = 1e-4;

/// Parameters derived for a single sound on a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    /// Distance from listener to emitter in world units.
    pub distance: f32,
    /// Volume multiplier (0.0 to 1.0).
    pub gain: f32,
    /// Stereo position, -1.0 (left) to 1.0 (right).
    pub pan: f32,
    /// Playback rate multiplier from Doppler.
    pub pitch: f32,
}

impl Default for SpatialParams {
    fn default() -> Self {
        Self {
            distance: 0.0,
            gain: 1.0,
            pan: 0.0,
            pitch: 1.0,
        }
    }
}

/// Compute the listener-relative parameters for `emitter`.
pub fn compute(
    listener: &Listener,
    emitter: &EmitterDescriptor,
    settings: &SpatialSettings,
) -> SpatialParams {
    let offset = emitter.position - listener.position;
    let distance = offset.length();
    if distance < CO_LOCATED_EPSILON {
        return SpatialParams::default();
    }
    let direction = offset / distance;

    let gain = 1.0 / (distance / settings.distance_scale).max(1.0);
    let pan = listener.right().dot(direction).clamp(-1.0, 1.0);
    let pitch = doppler_pitch(
        listener.velocity.dot(direction),
        emitter.velocity.dot(direction),
        settings,
    );

    SpatialParams {
        distance,
        gain,
        pan,
        pitch,
    }
}

/// Doppler pitch for velocities projected on the listener-to-emitter axis.
///
/// `listener_speed > 0` means the listener closes in on the emitter;
/// `emitter_speed > 0` means the emitter moves away from the listener.
fn doppler_pitch(listener_speed: f32, emitter_speed: f32, settings: &SpatialSettings) -> f32 {
    if settings.doppler_scale == 0.0 {
        return 1.0;
    }

    let c = settings.speed_of_sound;
    let numerator = c + listener_speed * settings.doppler_scale;
    let denominator = c + emitter_speed * settings.doppler_scale;
    // Emitter closing in at or above the speed of sound.
    if denominator < 0.01 {
        return MAX_PITCH;
    }

    (numerator / denominator).clamp(MIN_PITCH, MAX_PITCH)
}

//! Property-based tests for the spatial parameter model
//!
//! Validates, for arbitrary listener/emitter placements:
//! - Gain stays in (0, 1] and never increases with distance
//! - Pan stays in [-1, 1]
//! - Pitch stays within one octave and is neutral when Doppler is off

use audio3d_audio::spatial::{self, MAX_PITCH, MIN_PITCH};
use audio3d_audio::{EmitterDescriptor, Listener, SpatialSettings};
use glam::Vec3;
use proptest::prelude::*;

fn vec3(range: f32) -> impl Strategy<Value = Vec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    /// Property: all parameters stay inside their documented ranges.
    #[test]
    fn parameters_stay_in_range(
        listener_position in vec3(10_000.0),
        listener_velocity in vec3(1_000.0),
        emitter_position in vec3(10_000.0),
        emitter_velocity in vec3(1_000.0),
        distance_scale in 0.1f32..5_000.0,
        doppler_scale in 0.0f32..4.0,
    ) {
        let listener = Listener {
            position: listener_position,
            velocity: listener_velocity,
            ..Listener::default()
        };
        let emitter = EmitterDescriptor {
            velocity: emitter_velocity,
            ..EmitterDescriptor::at(emitter_position)
        };
        let settings = SpatialSettings::new(distance_scale, doppler_scale);

        let params = spatial::compute(&listener, &emitter, &settings);

        prop_assert!(params.gain > 0.0 && params.gain <= 1.0, "gain {}", params.gain);
        prop_assert!((-1.0..=1.0).contains(&params.pan), "pan {}", params.pan);
        prop_assert!(
            (MIN_PITCH..=MAX_PITCH).contains(&params.pitch),
            "pitch {}",
            params.pitch
        );
    }

    /// Property: moving an emitter further along the same ray never makes it louder.
    #[test]
    fn gain_is_monotonic_in_distance(
        direction in vec3(1.0).prop_filter("non-zero direction", |v| v.length() > 0.01),
        near in 1.0f32..5_000.0,
        extra in 0.0f32..5_000.0,
        distance_scale in 1.0f32..3_000.0,
    ) {
        let direction = direction.normalize();
        let settings = SpatialSettings::new(distance_scale, 0.0);
        let listener = Listener::default();

        let close = spatial::compute(&listener, &EmitterDescriptor::at(direction * near), &settings);
        let far = spatial::compute(
            &listener,
            &EmitterDescriptor::at(direction * (near + extra)),
            &settings,
        );

        prop_assert!(far.gain <= close.gain + 1e-6);
    }

    /// Property: with Doppler disabled, motion never changes pitch.
    #[test]
    fn zero_doppler_scale_keeps_pitch_neutral(
        emitter_position in vec3(5_000.0),
        emitter_velocity in vec3(2_000.0),
        listener_velocity in vec3(2_000.0),
    ) {
        let listener = Listener {
            velocity: listener_velocity,
            ..Listener::default()
        };
        let emitter = EmitterDescriptor {
            velocity: emitter_velocity,
            ..EmitterDescriptor::at(emitter_position)
        };

        let params = spatial::compute(&listener, &emitter, &SpatialSettings::new(1.0, 0.0));
        prop_assert_eq!(params.pitch, 1.0);
    }
}

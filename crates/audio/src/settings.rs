//! Process-wide spatial tuning.

use crate::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};

/// Distance and Doppler tuning shared by every 3D sound.
///
/// Configured once when the manager is initialized; these are not per-sound
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialSettings {
    /// World units within which a sound plays at full volume (> 0).
    pub distance_scale: f32,
    /// Doppler strength (0.0 disables pitch shifting).
    pub doppler_scale: f32,
    /// Speed of sound in world units per second (> 0).
    pub speed_of_sound: f32,
}

impl Default for SpatialSettings {
    fn default() -> Self {
        Self {
            distance_scale: 1.0,
            doppler_scale: 1.0,
            speed_of_sound: 343.5,
        }
    }
}

impl SpatialSettings {
    /// Create settings with the given scales and the default speed of sound.
    pub fn new(distance_scale: f32, doppler_scale: f32) -> Self {
        Self {
            distance_scale,
            doppler_scale,
            ..Default::default()
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> AudioResult<()> {
        if !self.distance_scale.is_finite() || self.distance_scale <= 0.0 {
            return Err(AudioError::InvalidSettings(format!(
                "distance_scale must be > 0, got {}",
                self.distance_scale
            )));
        }
        if !self.doppler_scale.is_finite() || self.doppler_scale < 0.0 {
            return Err(AudioError::InvalidSettings(format!(
                "doppler_scale must be >= 0, got {}",
                self.doppler_scale
            )));
        }
        if !self.speed_of_sound.is_finite() || self.speed_of_sound <= 0.0 {
            return Err(AudioError::InvalidSettings(format!(
                "speed_of_sound must be > 0, got {}",
                self.speed_of_sound
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = SpatialSettings::default();
        assert_eq!(settings.distance_scale, 1.0);
        assert_eq!(settings.doppler_scale, 1.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_doppler_is_allowed() {
        assert!(SpatialSettings::new(2000.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(SpatialSettings::new(0.0, 0.1).validate().is_err());
        assert!(SpatialSettings::new(-1.0, 0.1).validate().is_err());
        assert!(SpatialSettings::new(f32::NAN, 0.1).validate().is_err());
        assert!(SpatialSettings::new(1.0, -0.5).validate().is_err());

        let silent_air = SpatialSettings {
            speed_of_sound: 0.0,
            ..Default::default()
        };
        assert!(silent_air.validate().is_err());
    }
}

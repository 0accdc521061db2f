//! The ear that hears every 3D sound.

use glam::Vec3;

/// Listener state, usually copied from the camera once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    /// World-space position.
    pub position: Vec3,
    /// Facing direction.
    pub forward: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Velocity, used for Doppler.
    pub velocity: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            velocity: Vec3::ZERO,
        }
    }
}

impl Listener {
    /// Create a stationary listener at `position` with the default orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Listener's right-hand axis (`forward x up`), or zero if degenerate.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listener_faces_negative_z() {
        let listener = Listener::default();
        assert_eq!(listener.forward, Vec3::NEG_Z);
        assert_eq!(listener.right(), Vec3::X);
    }

    #[test]
    fn degenerate_orientation_has_no_right_axis() {
        let listener = Listener {
            forward: Vec3::Y,
            up: Vec3::Y,
            ..Default::default()
        };
        assert_eq!(listener.right(), Vec3::ZERO);
    }
}

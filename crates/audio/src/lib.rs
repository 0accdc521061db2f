#![warn(missing_docs)]
//! Spatial audio for audio3d.
//!
//! Tracks the positional sounds that are currently playing, re-applies their
//! listener-relative 3D parameters every tick, and reclaims playback
//! instances once the engine reports them stopped.
//!
//! # Architecture
//!
//! - [`AudioManager`] - Owns the catalog, the listener, and the active sound registry
//! - [`PlaybackEngine`] - Backend seam (simulated, rodio, or a test fake)
//! - [`ResourceLoader`] - Resolves sound identifiers into engine waveforms
//! - [`Emitter`] - Capability implemented by anything that makes a sound
//! - [`SpatialSettings`] - Distance/Doppler tuning shared by every sound
//!
//! # Example
//!
//! ```ignore
//! let mut audio = AudioManager::initialize(engine, &mut loader, &["DogSound"], settings)?;
//! let handle = audio.play_sound("DogSound", true, &dog_body)?;
//! audio.set_listener(camera_listener);
//! audio.tick();
//! audio.stop(handle, false);
//! audio.shutdown();
//! ```

pub mod backend;
mod catalog;
mod emitter;
mod engine;
mod error;
mod listener;
mod manager;
mod settings;
pub mod spatial;

pub use catalog::SoundCatalog;
pub use emitter::{Emitter, EmitterDescriptor};
pub use engine::{PlaybackEngine, PlaybackState, ResourceLoader, SoundHandle};
pub use error::{AudioError, AudioResult};
pub use listener::Listener;
pub use manager::{AudioManager, TickSummary};
pub use settings::SpatialSettings;
pub use spatial::SpatialParams;

//! Audio manager: active sound registry and per-tick spatialization.

use crate::{
    AudioError, AudioResult, Emitter, EmitterDescriptor, Listener, PlaybackEngine, PlaybackState,
    ResourceLoader, SoundCatalog, SoundHandle, SpatialSettings,
};
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

/// A playing sound and the emitter it follows.
struct ActiveSound {
    handle: SoundHandle,
    name: String,
    emitter: Weak<dyn Emitter>,
    /// Set once the emitter has been dropped and a stop was requested.
    orphaned: bool,
}

/// What a single [`AudioManager::tick`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Sounds whose 3D parameters were re-applied.
    pub spatialized: usize,
    /// Sounds released and removed from the registry.
    pub retired: usize,
    /// Sounds skipped because their emitter no longer exists.
    pub orphaned: usize,
}

/// Keeps track of which 3D sounds are playing, updates their settings as the
/// listener and emitters move, and releases instances once they finish.
///
/// The only way to obtain a manager is [`AudioManager::initialize`], so a
/// manager whose catalog failed to load never exists.
pub struct AudioManager<E: PlaybackEngine> {
    /// Playback backend
    engine: E,
    /// Tuning forwarded to the engine at initialization
    settings: SpatialSettings,
    /// Loaded sound definitions
    catalog: SoundCatalog<E::Waveform>,
    /// The ear hearing every sound
    listener: Listener,
    /// Reused for every apply; overwritten, never accumulated
    scratch: EmitterDescriptor,
    /// Sounds currently registered for spatialization
    active: Vec<ActiveSound>,
}

impl<E: PlaybackEngine> AudioManager<E> {
    /// Configure `engine`, load every sound in `names`, and build the manager.
    ///
    /// Fails with [`AudioError::InvalidSettings`] if `settings` are out of
    /// range, or [`AudioError::Load`] if any sound cannot be resolved. In the
    /// latter case everything loaded so far is handed back to the engine.
    pub fn initialize<L, S>(
        mut engine: E,
        loader: &mut L,
        names: &[S],
        settings: SpatialSettings,
    ) -> AudioResult<Self>
    where
        L: ResourceLoader<Waveform = E::Waveform>,
        S: AsRef<str>,
    {
        settings.validate()?;
        engine.set_distance_scale(settings.distance_scale);
        engine.set_doppler_scale(settings.doppler_scale);

        let catalog = match SoundCatalog::load(loader, names) {
            Ok(catalog) => catalog,
            Err((err, loaded)) => {
                for waveform in loaded {
                    engine.unload(waveform);
                }
                return Err(err);
            }
        };

        info!(
            sounds = catalog.len(),
            distance_scale = settings.distance_scale,
            doppler_scale = settings.doppler_scale,
            "Audio manager initialized"
        );
        for name in catalog.names() {
            debug!(sound = name, "Sound loaded");
        }

        Ok(Self {
            engine,
            settings,
            catalog,
            listener: Listener::default(),
            scratch: EmitterDescriptor::default(),
            active: Vec::new(),
        })
    }

    /// Spatial tuning in effect.
    pub fn settings(&self) -> &SpatialSettings {
        &self.settings
    }

    /// Loaded sound definitions.
    pub fn catalog(&self) -> &SoundCatalog<E::Waveform> {
        &self.catalog
    }

    /// Current listener.
    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Mutable access to the listener.
    pub fn listener_mut(&mut self) -> &mut Listener {
        &mut self.listener
    }

    /// Replace the listener (call once per tick, before [`tick`](Self::tick)).
    pub fn set_listener(&mut self, listener: Listener) {
        self.listener = listener;
    }

    /// Backend.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable backend access, e.g. to pump its clock.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Trigger a new 3D sound attached to `emitter`.
    ///
    /// The sound is spatialized before it starts so it never plays from a
    /// stale position. The returned handle can be passed to
    /// [`stop`](Self::stop); the manager keeps ownership of the instance and
    /// releases it once the engine reports it stopped.
    pub fn play_sound<T>(
        &mut self,
        name: &str,
        looped: bool,
        emitter: &Rc<T>,
    ) -> AudioResult<SoundHandle>
    where
        T: Emitter + 'static,
    {
        let waveform = self
            .catalog
            .get(name)
            .ok_or_else(|| AudioError::NotFound(name.to_owned()))?;

        let handle = self.engine.create_instance(waveform)?;
        self.engine.set_looping(handle, looped);

        let emitter: Weak<T> = Rc::downgrade(emitter);
        let emitter: Weak<dyn Emitter> = emitter;
        let sound = ActiveSound {
            handle,
            name: name.to_owned(),
            emitter,
            orphaned: false,
        };

        apply_3d(&mut self.engine, &self.listener, &mut self.scratch, &sound);
        self.engine.play(handle);
        self.active.push(sound);

        debug!(sound = name, %handle, looped, "Started 3D sound");
        Ok(handle)
    }

    /// Ask the engine to stop a registered sound.
    ///
    /// The entry stays registered (and may be spatialized once more) until
    /// the engine reports it stopped. Returns `false` if `handle` is not
    /// registered.
    pub fn stop(&mut self, handle: SoundHandle, immediate: bool) -> bool {
        if !self.is_active(handle) {
            debug!(%handle, "Stop requested for a sound that is no longer active");
            return false;
        }
        self.engine.stop(handle, immediate);
        true
    }

    /// Retire finished sounds and re-apply 3D settings to the rest.
    pub fn tick(&mut self) -> TickSummary {
        let mut summary = TickSummary::default();

        let mut index = 0;
        while index < self.active.len() {
            let handle = self.active[index].handle;

            if self.engine.state(handle) == PlaybackState::Stopped {
                self.engine.release(handle);
                // The swapped-in entry is examined next without advancing.
                let retired = self.active.swap_remove(index);
                debug!(sound = %retired.name, %handle, "Retired finished sound");
                summary.retired += 1;
                continue;
            }

            let sound = &mut self.active[index];
            if apply_3d(&mut self.engine, &self.listener, &mut self.scratch, sound) {
                summary.spatialized += 1;
            } else {
                summary.orphaned += 1;
                if !sound.orphaned {
                    warn!(
                        sound = %sound.name,
                        %handle,
                        "Emitter dropped while its sound was playing; stopping it"
                    );
                    sound.orphaned = true;
                    self.engine.stop(handle, true);
                }
            }

            index += 1;
        }

        summary
    }

    /// Number of registered sounds.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether `handle` is still registered.
    pub fn is_active(&self, handle: SoundHandle) -> bool {
        self.active.iter().any(|sound| sound.handle == handle)
    }

    /// Handles of every registered sound, in no particular order.
    pub fn active_handles(&self) -> impl Iterator<Item = SoundHandle> + '_ {
        self.active.iter().map(|sound| sound.handle)
    }

    /// Engine-reported state of `handle`.
    pub fn state(&self, handle: SoundHandle) -> PlaybackState {
        self.engine.state(handle)
    }

    /// Stop and release every sound, then unload the catalog.
    pub fn shutdown(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        if self.active.is_empty() && self.catalog.is_empty() {
            return;
        }

        let live = self.active.len();
        for sound in self.active.drain(..) {
            self.engine.stop(sound.handle, true);
            self.engine.release(sound.handle);
        }

        let mut unloaded = 0;
        for (_, waveform) in self.catalog.drain() {
            self.engine.unload(waveform);
            unloaded += 1;
        }

        info!(live, unloaded, "Audio manager shut down");
    }
}

impl<E: PlaybackEngine> Drop for AudioManager<E> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Copy the emitter's current state into `scratch` and hand it to the engine.
///
/// Returns `false` without touching the engine if the emitter is gone.
fn apply_3d<E: PlaybackEngine>(
    engine: &mut E,
    listener: &Listener,
    scratch: &mut EmitterDescriptor,
    sound: &ActiveSound,
) -> bool {
    let Some(emitter) = sound.emitter.upgrade() else {
        return false;
    };
    scratch.capture(emitter.as_ref());
    engine.apply_3d(sound.handle, listener, scratch);
    true
}

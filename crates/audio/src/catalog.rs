//! Sound definitions loaded once at startup.

use crate::{AudioError, ResourceLoader};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Fixed mapping from sound identifier to loaded waveform.
///
/// Read-only after [`SoundCatalog::load`]; every active sound created from an
/// entry shares the same waveform.
#[derive(Debug)]
pub struct SoundCatalog<W> {
    sounds: HashMap<String, W>,
}

impl<W> SoundCatalog<W> {
    /// Resolve every identifier in `names` through `loader`.
    ///
    /// On failure, the waveforms loaded so far are returned alongside the
    /// error so the caller can hand them back to its engine.
    pub fn load<L, S>(loader: &mut L, names: &[S]) -> Result<Self, (AudioError, Vec<W>)>
    where
        L: ResourceLoader<Waveform = W>,
        S: AsRef<str>,
    {
        let mut sounds = HashMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if sounds.contains_key(name) {
                warn!(sound = name, "Ignoring duplicate sound in catalog list");
                continue;
            }
            match loader.load(name) {
                Ok(waveform) => {
                    debug!(sound = name, "Loaded sound");
                    sounds.insert(name.to_owned(), waveform);
                }
                Err(err) => {
                    let loaded = sounds.into_values().collect();
                    return Err((AudioError::load(name, err), loaded));
                }
            }
        }
        Ok(Self { sounds })
    }

    /// Look up a waveform by identifier.
    pub fn get(&self, name: &str) -> Option<&W> {
        self.sounds.get(name)
    }

    /// Whether `name` is part of the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Number of loaded sounds.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Loaded identifiers, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sounds.keys().map(String::as_str)
    }

    /// Remove and return every waveform, leaving the catalog empty.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (String, W)> + '_ {
        self.sounds.drain()
    }
}

//! Resource loader double.

use crate::FakeWaveform;
use anyhow::{bail, Result};
use audio3d_audio::ResourceLoader;
use std::collections::BTreeSet;

/// Loader that resolves any name it was told about and fails on the rest.
#[derive(Debug, Default, Clone)]
pub struct FakeLoader {
    known: BTreeSet<String>,
    loaded: Vec<String>,
}

impl FakeLoader {
    /// Loader that can resolve every name in `known`.
    pub fn with_sounds<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
            loaded: Vec::new(),
        }
    }

    /// Names successfully loaded, in call order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }
}

impl ResourceLoader for FakeLoader {
    type Waveform = FakeWaveform;

    fn load(&mut self, name: &str) -> Result<FakeWaveform> {
        if !self.known.contains(name) {
            bail!("asset `{name}` does not exist");
        }
        self.loaded.push(name.to_owned());
        Ok(FakeWaveform {
            name: name.to_owned(),
        })
    }
}

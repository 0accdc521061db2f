//! Reads encoded sound files from an asset directory.

use crate::ResourceLoader;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions tried, in order, for each sound identifier.
const EXTENSIONS: &[&str] = &["wav", "ogg"];

/// Raw encoded bytes of a sound file, shared by every instance.
#[derive(Debug, Clone)]
pub struct EncodedSound {
    bytes: Arc<[u8]>,
}

impl EncodedSound {
    /// Wrap already-read file contents.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap clone of the shared buffer.
    pub fn shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

/// Resolves `name` to `<root>/<name>.wav` or `<root>/<name>.ogg`.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    /// Loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl ResourceLoader for FileLoader {
    type Waveform = EncodedSound;

    fn load(&mut self, name: &str) -> Result<EncodedSound> {
        let Some(path) = self.resolve(name) else {
            bail!(
                "no {} file for `{name}` in {}",
                EXTENSIONS.join("/"),
                self.root.display()
            );
        };
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        if bytes.is_empty() {
            bail!("{} is empty", path.display());
        }
        Ok(EncodedSound::new(bytes))
    }
}

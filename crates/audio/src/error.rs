//! Error taxonomy for the audio subsystem.

use thiserror::Error;

/// Errors surfaced by the audio manager and its backends.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A catalog entry could not be resolved during initialization.
    #[error("failed to load sound `{name}`: {source}")]
    Load {
        /// Identifier that failed to resolve.
        name: String,
        /// Underlying loader failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// A sound was requested that is not part of the catalog.
    #[error("sound `{0}` is not in the catalog")]
    NotFound(String),
    /// Spatial tuning constants are out of range.
    #[error("invalid spatial settings: {0}")]
    InvalidSettings(String),
    /// The playback backend could not create an instance.
    #[error("playback engine error: {0}")]
    Engine(String),
}

impl AudioError {
    /// Build a [`AudioError::Load`] from a loader failure.
    pub fn load(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Load {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Convenience alias used across the crate.
pub type AudioResult<T> = Result<T, AudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_keeps_source_message() {
        let err = AudioError::load("CatSound0", anyhow::anyhow!("file missing"));
        let text = err.to_string();
        assert!(text.contains("CatSound0"));
        assert!(text.contains("file missing"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn not_found_names_the_sound() {
        let err = AudioError::NotFound("Z".into());
        assert_eq!(err.to_string(), "sound `Z` is not in the catalog");
    }
}

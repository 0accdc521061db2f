use anyhow::Result;
use audio3d_audio::SpatialSettings;
use audio3d_camera::CameraTuning;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/audio3d.toml";

/// A catalog entry: identifier plus the clip length used by the simulated backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SoundEntry {
    pub name: String,
    /// Clip length in seconds (ignored by the rodio backend).
    #[serde(default = "default_clip_seconds")]
    pub duration_secs: f32,
}

fn default_clip_seconds() -> f32 {
    1.0
}

impl SoundEntry {
    fn new(name: &str, duration_secs: f32) -> Self {
        Self {
            name: name.to_owned(),
            duration_secs,
        }
    }

    /// Clip length, or the default length if `duration_secs` does not fit a `Duration`.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.duration_secs.max(0.0)).unwrap_or_else(|err| {
            let fallback = default_clip_seconds();
            warn!(
                sound = %self.name,
                duration_secs = self.duration_secs,
                %err,
                "Invalid clip duration. Using {fallback}s"
            );
            Duration::from_secs_f32(fallback)
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Audio3dConfig {
    /// Fixed simulation rate in ticks per second.
    pub tick_rate: u32,
    /// Seed for the cat's sound choice.
    pub seed: u64,
    /// Directory holding `<name>.wav` / `<name>.ogg` for the rodio backend.
    pub assets_dir: PathBuf,
    pub audio: SpatialSettings,
    pub camera: CameraTuning,
    pub sounds: Vec<SoundEntry>,
}

impl Default for Audio3dConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            seed: 0,
            assets_dir: PathBuf::from("assets/sounds"),
            audio: SpatialSettings::new(2000.0, 0.1),
            camera: CameraTuning::default(),
            sounds: vec![
                SoundEntry::new("CatSound0", 0.9),
                SoundEntry::new("CatSound1", 0.7),
                SoundEntry::new("CatSound2", 1.1),
                SoundEntry::new("DogSound", 1.5),
            ],
        }
    }
}

impl Audio3dConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Audio3dConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    Audio3dConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                Audio3dConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn sound_names(&self) -> Vec<&str> {
        self.sounds.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }
}

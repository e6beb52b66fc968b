//! Runtime configuration
//!
//! Loaded from `~/.config/keystars/config.toml` when present. Every field has
//! a default, so a partial file (or none at all) is fine. Star colors and
//! fade thresholds are fixed in `keystars_core::color` and not configurable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use keystars_core::animator::{
    DEFAULT_FADES_PER_SECOND, DEFAULT_STARS_PER_SECOND, DEFAULT_TICK_MS,
};
use keystars_core::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_DIMENSION};
use keystars_core::StarfieldTiming;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading, saving or validating the config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where frames go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// True-color preview in the terminal
    #[default]
    Terminal,
    /// Discard frames
    Null,
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Main loop period in milliseconds (1-1000)
    pub tick_ms: u32,
    /// Target rate of randomly spawned stars
    pub stars_per_second: u32,
    /// Fade passes per second
    pub fades_per_second: u32,
    /// Layout columns
    pub grid_width: usize,
    /// Layout rows
    pub grid_height: usize,
    /// Delay between device init and the first frame
    pub init_delay_ms: u64,
    pub sink: SinkKind,
    /// evdev device paths; empty means auto-detect keyboards
    pub devices: Vec<PathBuf>,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            stars_per_second: DEFAULT_STARS_PER_SECOND,
            fades_per_second: DEFAULT_FADES_PER_SECOND,
            grid_width: DEFAULT_WIDTH,
            grid_height: DEFAULT_HEIGHT,
            init_delay_ms: 1000,
            sink: SinkKind::default(),
            devices: Vec::new(),
            seed: None,
        }
    }
}

impl StarfieldConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keystars")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StarfieldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(write_err)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.tick_ms) {
            return Err(ConfigError::Invalid(format!(
                "tick_ms must be 1-1000, got {}",
                self.tick_ms
            )));
        }
        let polls_per_second = 1000 / self.tick_ms;
        if self.stars_per_second > polls_per_second {
            return Err(ConfigError::Invalid(format!(
                "stars_per_second must be at most {} with {}ms ticks, got {}",
                polls_per_second, self.tick_ms, self.stars_per_second
            )));
        }
        if self.fades_per_second == 0 {
            return Err(ConfigError::Invalid(
                "fades_per_second must be at least 1".into(),
            ));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > MAX_DIMENSION || self.grid_height > MAX_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "grid must be at most {MAX_DIMENSION}x{MAX_DIMENSION}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_ms))
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    pub fn timing(&self) -> StarfieldTiming {
        StarfieldTiming::from_rates(self.tick_ms, self.stars_per_second, self.fades_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_effect_constants() {
        let config = StarfieldConfig::default();
        assert_eq!(config.tick(), Duration::from_millis(50));
        assert_eq!(config.timing().star_chance, 25);
        assert_eq!(config.timing().fade_period, 2);
        assert_eq!((config.grid_width, config.grid_height), (21, 6));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config = StarfieldConfig::from_toml("tick_ms = 20\nsink = \"null\"\n").unwrap();
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.sink, SinkKind::Null);
        assert_eq!(config.stars_per_second, 5);
        assert!(config.devices.is_empty());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_roundtrip() {
        let config = StarfieldConfig {
            devices: vec![PathBuf::from("/dev/input/event3")],
            seed: Some(42),
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("sink = \"terminal\""));
        assert_eq!(StarfieldConfig::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            StarfieldConfig::from_toml("tick_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StarfieldConfig::from_toml("tick_ms = 1500"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StarfieldConfig::from_toml("grid_height = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StarfieldConfig::from_toml("sink = \"hid\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_out_of_range_rates_and_sizes() {
        // 50ms ticks give 20 polls per second
        assert!(StarfieldConfig::from_toml("stars_per_second = 20").is_ok());
        for doc in [
            "stars_per_second = 21",
            "stars_per_second = 50000000",
            "tick_ms = 1000\nstars_per_second = 2",
            "grid_width = 256",
            "grid_height = 100000",
        ] {
            assert!(
                matches!(StarfieldConfig::from_toml(doc), Err(ConfigError::Invalid(_))),
                "{doc}"
            );
        }
    }

    #[test]
    fn test_save_creates_directories_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keystars").join("config.toml");
        let config = StarfieldConfig {
            tick_ms: 40,
            sink: SinkKind::Null,
            seed: Some(7),
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(StarfieldConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("keystars-test-does-not-exist.toml");
        assert_eq!(
            StarfieldConfig::load(&path).unwrap(),
            StarfieldConfig::default()
        );
    }
}

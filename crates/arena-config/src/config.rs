//! Settings structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use arena_terrain::{ArenaParameters, GenerationConfig, default_worker_count};
use serde::{Deserialize, Serialize};

use crate::error::ConfigFileError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "worley-arena";

/// Default config directory, `<os config dir>/worley-arena`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Top-level settings for the terrain generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Raw generation parameters. Ignored when `arena` is set.
    pub generation: GenerationConfig,
    /// Output raster settings.
    pub output: OutputConfig,
    /// Arena preset. Supersedes `generation` and the output size.
    pub arena: Option<ArenaParameters>,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Output raster configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Heightfield columns.
    pub width: u32,
    /// Heightfield rows.
    pub height: u32,
    /// Worker threads; `None` uses all cores but one.
    pub workers: Option<usize>,
    /// Write the finished heightfield as JSON to this path.
    pub export_path: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            workers: None,
            export_path: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A fully resolved generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Parameters to validate and generate from.
    pub config: GenerationConfig,
    /// Output `(width, height)`.
    pub output_size: (u32, u32),
    /// Worker threads to use.
    pub workers: usize,
}

impl Config {
    /// Resolve the generation parameters, output size and worker count,
    /// letting an arena preset take precedence over the raw settings.
    pub fn request(&self) -> GenerationRequest {
        let (config, output_size) = match &self.arena {
            Some(arena) => (arena.to_generation_config(), arena.output_size()),
            None => (
                self.generation.clone(),
                (self.output.width, self.output.height),
            ),
        };

        GenerationRequest {
            config,
            output_size,
            workers: self.output.workers.unwrap_or_else(default_worker_count),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigFileError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(ConfigFileError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigFileError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigFileError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigFileError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigFileError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigFileError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigFileError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigFileError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigFileError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

//! Configuration management for waymark.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::activity::Coords;
use crate::error::{Error, Result};
use crate::surface;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "waymark";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "activities.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `WAYMARK_`)
/// 2. TOML config file at `~/.config/waymark/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Map configuration.
    pub map: MapConfig,
    /// Geolocation configuration.
    pub geolocation: GeolocationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/waymark/activities.db`
    pub database_path: Option<PathBuf>,
}

/// Map-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Zoom level for the initial view and recentering.
    pub zoom_level: u8,
    /// Tile endpoint the map backend renders from.
    pub tile_url: String,
}

/// Geolocation-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Fixed position to use when no platform position source exists.
    /// Left unset, position acquisition fails like a denied request.
    pub fixed_position: Option<Coords>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom_level: surface::DEFAULT_ZOOM,
            tile_url: surface::OSM_TILE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `WAYMARK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("WAYMARK_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(1..=19).contains(&self.map.zoom_level) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "zoom_level ({}) must be between 1 and 19",
                    self.map.zoom_level
                ),
            });
        }

        if self.map.tile_url.is_empty() {
            return Err(Error::ConfigValidation {
                message: "tile_url must not be empty".to_string(),
            });
        }

        if let Some(position) = self.geolocation.fixed_position {
            if !position.is_valid() {
                return Err(Error::ConfigValidation {
                    message: format!("fixed_position ({position}) is out of bounds"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

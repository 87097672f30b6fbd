//! Configuration management for gudlft.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the user config directory.
const CONFIG_DIR_NAME: &str = "gudlft";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "GUDLFT_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GUDLFT_`, sections split on `__`,
///    e.g. `GUDLFT_BOOKING__MAX_PLACES_PER_COMPETITION=6`)
/// 2. TOML config file at `~/.config/gudlft/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Data file locations.
    pub data: DataConfig,
    /// Booking rules.
    pub booking: BookingRules,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,
}

/// Where the club and competition lists are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to `clubs.json`.
    pub clubs_path: PathBuf,
    /// Path to `competitions.json`.
    pub competitions_path: PathBuf,
}

/// Limits applied when a club purchases places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRules {
    /// Most places one club may hold in a single competition.
    pub max_places_per_competition: u32,
    /// Points charged for each place.
    pub points_per_place: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            clubs_path: PathBuf::from("clubs.json"),
            competitions_path: PathBuf::from("competitions.json"),
        }
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            max_places_per_competition: 12,
            points_per_place: 1,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.booking.max_places_per_competition == 0 {
            return Err(Error::config_validation(
                "max_places_per_competition must be greater than 0",
            ));
        }

        if self.booking.points_per_place == 0 {
            return Err(Error::config_validation(
                "points_per_place must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Parse the configured listen address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|_| {
            Error::config_validation(format!(
                "server.bind ({}) is not a socket address",
                self.server.bind
            ))
        })
    }
}

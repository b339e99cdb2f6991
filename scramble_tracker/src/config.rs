use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid tracker configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables of the scramble tracker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How many wrong moves in a row are tracked before the tracker gives up on guiding the user back and asks for the cube to be reset
    pub max_divergence: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig { max_divergence: 10 }
    }
}

impl TrackerConfig {
    /// # Errors
    ///
    /// Fails if the text isn't valid TOML or has a key of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<TrackerConfig, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read the configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or doesn't parse.
    pub fn load(path: impl AsRef<Path>) -> Result<TrackerConfig, ConfigError> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        log::debug!("Loaded tracker configuration from {}", path.display());

        TrackerConfig::from_toml_str(&text)
    }
}

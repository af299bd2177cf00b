//! Tool configuration
//!
//! An optional `rdt.yaml` in the working directory, with a user-level
//! fallback under the OS config directory. Absent files yield defaults;
//! malformed files are an error.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file name searched for in the working directory and the
/// user config directory.
pub const CONFIG_FILE: &str = "rdt.yaml";

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Significant digits used when rounding table values
    pub display_digits: usize,

    /// Histogram bin count
    pub histogram_bins: usize,

    /// Terminal histogram canvas width in braille pixels
    pub histogram_width: u32,

    /// Terminal histogram canvas height in braille pixels
    pub histogram_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_digits: 6,
            histogram_bins: crate::core::histogram::DEFAULT_BINS,
            histogram_width: 120,
            histogram_height: 40,
        }
    }
}

impl Config {
    /// Load configuration, preferring the working directory over the user
    /// config directory.
    pub fn load() -> Result<Config, ConfigError> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dirs) = ProjectDirs::from("", "", "rdt") {
            candidates.push(dirs.config_dir().join(CONFIG_FILE));
        }

        for path in candidates {
            if path.is_file() {
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                        path: path.clone(),
                        source,
                    })?;
                return serde_yml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path,
                    message: e.to_string(),
                });
            }
        }

        Ok(Config::default())
    }
}

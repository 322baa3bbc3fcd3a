//! Diagram configuration
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Command-line flags (`--no-legend`, `--ids`)
//! 2. Config file (`--config PATH`, else `~/.config/taskfile2d2/config.toml`)
//! 3. Defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::ids::IdScheme;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Emit the legend container
    pub legend: bool,

    /// How synthetic container keys are generated
    pub ids: IdScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            legend: true,
            ids: IdScheme::default(),
        }
    }
}

impl Config {
    /// Returns `~/.config/taskfile2d2/` on Unix, `%APPDATA%/taskfile2d2/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskfile2d2")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConvertError::Config {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConvertError::Config { reason } => ConvertError::Config {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConvertError::Config {
            reason: format!("Failed to parse config: {}", e),
        })
    }
}

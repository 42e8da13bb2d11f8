//! Agent configuration
//!
//! This module handles loading the devhook agent configuration file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// General configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable debug logging
    #[serde(default)]
    pub verbose: bool,

    /// Also write logs to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Hook execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Timeout applied to actions that do not declare one (duration string)
    #[serde(default = "default_timeout")]
    pub default_timeout: String,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            default_timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> String {
    "10s".to_string()
}

/// Devhook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General configuration section
    #[serde(default)]
    pub general: GeneralConfig,

    /// Hook execution settings
    #[serde(default)]
    pub hooks: HooksConfig,
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content)
            .map_err(|e| Error::Config(format!("Failed to parse config TOML: {e}")))
    }

    /// Load the explicitly given file, or the default location if it exists
    ///
    /// An explicit path must exist. A missing default file yields the
    /// default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_file() {
            Some(default_path) if default_path.exists() => {
                tracing::debug!("Loading config from {}", default_path.display());
                Self::load(default_path)
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Get the default config file path
///
/// Returns `<config_dir>/devhook/config.toml`, e.g. `~/.config/devhook/config.toml`
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("devhook").join("config.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(!config.general.verbose);
        assert!(config.general.log_file.is_none());
        assert_eq!(config.hooks.default_timeout, "10s");
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml_str(
            r#"
[general]
verbose = true
log_file = "/var/log/devhook.log"

[hooks]
default_timeout = "1m"
"#,
        )
        .unwrap();

        assert!(config.general.verbose);
        assert_eq!(
            config.general.log_file,
            Some(PathBuf::from("/var/log/devhook.log"))
        );
        assert_eq!(config.hooks.default_timeout, "1m");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.hooks.default_timeout, "10s");
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml_str("[hooks\ndefault_timeout = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_or_default(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[hooks]\ndefault_timeout = \"45s\"\n").unwrap();

        let config = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.hooks.default_timeout, "45s");
    }
}

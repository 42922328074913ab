//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsconf/rsconf.toml`
//! 3. Environment variables: `RSCONF_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for rsconf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Definitions directory used when `-d` is not given (default: ./config)
    pub definitions_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from("config"),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect
/// "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub definitions_dir: Option<PathBuf>,
}

/// Get the XDG config directory for rsconf.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsconf").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsconf.toml"))
}

fn load_raw_settings(path: &std::path::Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            definitions_dir: overlay
                .definitions_dir
                .clone()
                .unwrap_or_else(|| self.definitions_dir.clone()),
        }
    }

    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Overlay the global config file
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Apply environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply RSCONF_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder =
            Config::builder().add_source(Environment::with_prefix("RSCONF").separator("__"));

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("definitions_dir") {
            settings.definitions_dir = PathBuf::from(val);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_definitions_dir() {
        let settings = Settings::default();
        assert_eq!(settings.definitions_dir, PathBuf::from("config"));
    }

    #[test]
    fn test_merge_with_overlay_wins() {
        let base = Settings::default();
        let overlay = RawSettings {
            definitions_dir: Some(PathBuf::from("/etc/rsconf")),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.definitions_dir, PathBuf::from("/etc/rsconf"));
    }

    #[test]
    fn test_merge_with_empty_overlay_keeps_base() {
        let base = Settings::default();
        let overlay = RawSettings::default();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged, base);
    }
}

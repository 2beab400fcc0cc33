//! Server configuration
//!
//! The persisted settings: loaded once at startup, saved once at shutdown.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Default settings file, next to the working directory.
pub const SETTINGS_FILE: &str = "chat-relay.toml";

const DEFAULT_PORT: u16 = 8888;

/// Persisted server settings. The listening port is the only value that
/// survives process restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub server_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, layering the file over built-in
    /// defaults. A missing file is not an error; malformed content is.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let cfg = config::Config::builder()
            .set_default("server_port", DEFAULT_PORT as i64)?
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Persists the settings as TOML, creating the parent directory when
    /// needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Resolves the settings file path in the current working directory.
pub fn settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

//! Settings loading for ipc-bridge.
//!
//! User-wide settings live in a TOML file:
//! - `$IPC_BRIDGE_CONFIG` when set
//! - otherwise `<config dir>/ipc-bridge/ipc-bridge.toml`
//!   (`$XDG_CONFIG_HOME` or `~/.config` on Linux)

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use super::BridgeSettings;

/// Environment variable overriding the user settings path.
pub const CONFIG_ENV_VAR: &str = "IPC_BRIDGE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Returns the path to the user settings file.
///
/// Returns None if neither the override variable nor a config directory is available.
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| dir.join("ipc-bridge").join("ipc-bridge.toml"))
}

/// Parse settings from TOML text. Missing keys take their defaults.
pub fn parse_settings(text: &str) -> ConfigResult<BridgeSettings> {
    Ok(toml::from_str(text)?)
}

pub fn load_settings(path: &Path) -> ConfigResult<BridgeSettings> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text)
}

/// Load the user settings file if one exists.
///
/// A missing file is `Ok(None)`; an unreadable or malformed one is an error.
pub fn load_user_settings() -> ConfigResult<Option<BridgeSettings>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };

    if !path.exists() {
        debug!(
            target: "ipc_bridge::config",
            "No user settings at {}",
            path.display()
        );
        return Ok(None);
    }

    load_settings(&path).map(Some)
}

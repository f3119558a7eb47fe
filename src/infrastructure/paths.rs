//! Platform path helpers.
//!
//! This module decides where urlscope keeps its files: the TOML config under
//! the platform config directory, and the persisted session token under the
//! platform data directory. Falls back to the current directory when the
//! platform directories cannot be determined (e.g. stripped-down containers
//! without a home).

use std::path::PathBuf;

/// Directory name used under the platform config/data roots.
const APP_DIR: &str = "urlscope";

/// Returns the configuration directory for urlscope.
///
/// Typically `~/.config/urlscope` on Linux.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns the data directory for urlscope.
///
/// Typically `~/.local/share/urlscope` on Linux. The session file lives
/// here.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns the default config file location (`config.toml` in
/// [`config_dir`]).
#[must_use]
pub fn default_config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the default session token file location (`session.json` in
/// [`data_dir`]).
#[must_use]
pub fn default_token_file() -> PathBuf {
    data_dir().join("session.json")
}

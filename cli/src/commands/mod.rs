//! Command handlers

pub mod config;
pub mod due;
pub mod run;
pub mod validate;

use std::path::PathBuf;

/// Default settings location: `~/.sentinel/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sentinel")
        .join("config.toml")
}

//! Storage Layer
//!
//! Locates the platform configuration directory and persists gesture scripts.

pub mod scripts;

use anyhow::Result;
use std::path::PathBuf;

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "lexilens", "LexiLens")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the configuration directory, creating it if needed
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default location of `config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

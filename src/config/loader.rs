// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawProjectConfig`.
///
/// This only performs TOML deserialization; it does **not** check store or
/// theme references. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawProjectConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that at least one store is defined and that store tables are
///   internally consistent.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let raw = load_from_path(&path)?;
    let config = ProjectConfig::try_from(raw)?;
    Ok(config)
}

/// Default config path: `leaf.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("leaf.toml")
}

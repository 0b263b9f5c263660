// src/config/mod.rs

//! Project configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load `leaf.toml` from disk (`loader.rs`).
//! - Validate store/theme references (`validate.rs`).
//! - Fixed source/output path conventions (`paths.rs`).

pub mod loader;
pub mod model;
pub mod paths;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{BuildSection, ProjectConfig, RawProjectConfig, StoreConfig};
pub use paths::{AssetClass, ProjectPaths};

// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level project configuration as read from `leaf.toml`.
///
/// Single-store projects use `[store]`; multi-store projects add one
/// `[stores.<name>]` table per store and select with `--store`:
///
/// ```toml
/// [store]
/// domain = "temp.example-store.com"
///
/// [store.themes]
/// development = "123456"
/// production = "654321"
///
/// [build.js]
/// inputs = ["src/scripts/theme.js"]
/// ```
///
/// This is the *raw* shape; [`ProjectConfig`] is the validated form the rest
/// of the application works with.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProjectConfig {
    /// Default store for single-store projects.
    #[serde(default)]
    pub store: Option<StoreConfig>,

    /// Named stores for multi-store projects, selected via `--store`.
    #[serde(default)]
    pub stores: BTreeMap<String, StoreConfig>,

    /// Build settings from `[build]`.
    #[serde(default)]
    pub build: BuildSection,
}

/// A remote store with its per-environment theme identifiers.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store domain, e.g. `temp.example-store.com`.
    pub domain: String,

    /// Password for password-protected preview stores.
    #[serde(default)]
    pub password: Option<String>,

    /// Environment name -> theme identifier. A missing or empty identifier
    /// means "let the remote tool pick" (typically the development theme).
    #[serde(default)]
    pub themes: BTreeMap<String, Option<String>>,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BuildSection {
    #[serde(default)]
    pub js: JsBuildSection,
}

/// `[build.js]` section: script entry points relative to the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct JsBuildSection {
    #[serde(default = "default_js_inputs")]
    pub inputs: Vec<String>,
}

fn default_js_inputs() -> Vec<String> {
    vec!["src/scripts/theme.js".to_string()]
}

impl Default for JsBuildSection {
    fn default() -> Self {
        Self {
            inputs: default_js_inputs(),
        }
    }
}

/// Validated project configuration.
///
/// Construct via `TryFrom<RawProjectConfig>` (see `validate.rs`) or
/// [`loader::load_and_validate`](crate::config::loader::load_and_validate).
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    store: Option<StoreConfig>,
    stores: BTreeMap<String, StoreConfig>,
    build: BuildSection,
}

impl ProjectConfig {
    /// Internal constructor used by validation. Callers outside `config`
    /// should go through `TryFrom` so the invariants hold.
    pub(crate) fn new_unchecked(
        store: Option<StoreConfig>,
        stores: BTreeMap<String, StoreConfig>,
        build: BuildSection,
    ) -> Self {
        Self {
            store,
            stores,
            build,
        }
    }

    pub fn build(&self) -> &BuildSection {
        &self.build
    }

    /// Resolve the store to operate on.
    ///
    /// `--store <name>` selects from `[stores.<name>]`; without the flag the
    /// single `[store]` table is used.
    pub fn resolve_store(&self, store_flag: Option<&str>) -> crate::errors::Result<&StoreConfig> {
        match store_flag {
            Some(name) => self.stores.get(name).ok_or_else(|| {
                crate::errors::LeafError::ConfigError(format!(
                    "store '{name}' is not defined in [stores] in leaf.toml"
                ))
            }),
            None => self.store.as_ref().ok_or_else(|| {
                crate::errors::LeafError::ConfigError(
                    "no [store] defined in leaf.toml; pass --store for multi-store projects"
                        .to_string(),
                )
            }),
        }
    }

    /// Theme identifier for the given store and environment, if configured.
    pub fn theme_id(&self, store: &StoreConfig, environment: &str) -> Option<String> {
        store.themes.get(environment).cloned().flatten()
    }
}

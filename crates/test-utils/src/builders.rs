#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use leafbuild::config::model::{
    BuildSection, JsBuildSection, ProjectConfig, RawProjectConfig, StoreConfig,
};

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectConfigBuilder {
    config: RawProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawProjectConfig {
                store: None,
                stores: BTreeMap::new(),
                build: BuildSection::default(),
            },
        }
    }

    pub fn with_store(mut self, domain: &str) -> Self {
        self.config.store = Some(store(domain));
        self
    }

    pub fn with_named_store(mut self, name: &str, domain: &str) -> Self {
        self.config.stores.insert(name.to_string(), store(domain));
        self
    }

    pub fn with_theme(mut self, environment: &str, theme_id: &str) -> Self {
        let store = self
            .config
            .store
            .get_or_insert_with(|| store("test.example-store.com"));
        store
            .themes
            .insert(environment.to_string(), Some(theme_id.to_string()));
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        let store = self
            .config
            .store
            .get_or_insert_with(|| store("test.example-store.com"));
        store.password = Some(password.to_string());
        self
    }

    pub fn with_js_inputs(mut self, inputs: &[&str]) -> Self {
        self.config.build.js = JsBuildSection {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        };
        self
    }

    pub fn build(self) -> ProjectConfig {
        ProjectConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new().with_store("test.example-store.com")
    }
}

fn store(domain: &str) -> StoreConfig {
    StoreConfig {
        domain: domain.to_string(),
        password: None,
        themes: BTreeMap::new(),
    }
}

/// On-disk project tree rooted in a tempdir, for end-to-end build tests.
pub struct ProjectTree {
    dir: TempDir,
}

impl ProjectTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp project dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file at a root-relative path, creating parent directories.
    pub fn write(&self, rel_path: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, contents).expect("Failed to write project file");
        self
    }

    pub fn exists(&self, rel_path: &str) -> bool {
        self.dir.path().join(rel_path).exists()
    }

    pub fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(rel_path)).expect("Failed to read project file")
    }
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

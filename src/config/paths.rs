// src/config/paths.rs

//! Fixed source/output path conventions.
//!
//! Directory roots and per-class globs are named constants; changing them is
//! a configuration concern outside the orchestration core. All globs and
//! mappings operate on paths *relative to the project root* with forward
//! slashes (e.g. `src/icons/arrow.svg`), matching what the watcher feeds in.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

pub const SRC_ROOT: &str = "src";
pub const DIST_ROOT: &str = "dist";
pub const TMP_ROOT: &str = "tmp";
pub const UPLOAD_ROOT: &str = "upload";

pub const DIST_ASSETS: &str = "dist/assets";
pub const DIST_SNIPPETS: &str = "dist/snippets";

/// Static asset subtrees copied verbatim from `src/` to `dist/`.
pub const STATIC_DIRS: &[&str] = &[
    "assets", "templates", "sections", "snippets", "blocks", "locales", "config", "layout",
];

/// Theme-settings subset synchronized back from `tmp/` to `src/` by
/// `pull` in settings-only mode.
pub const SETTINGS_GLOBS: &[&str] = &[
    "tmp/templates/**/*",
    "tmp/config/*",
    "tmp/sections/*.json",
    "tmp/blocks/*.json",
    "tmp/locales/*",
];

/// A category of source files sharing one transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Scripts,
    Styles,
    Statics,
    Icons,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Scripts,
        AssetClass::Styles,
        AssetClass::Statics,
        AssetClass::Icons,
    ];

    /// Root-relative glob patterns for this class.
    pub fn glob_patterns(&self) -> Vec<String> {
        match self {
            AssetClass::Scripts => vec!["src/scripts/**/*.js".to_string()],
            AssetClass::Styles => vec!["src/styles/**/*.{css,scss}".to_string()],
            AssetClass::Statics => STATIC_DIRS
                .iter()
                .map(|dir| format!("src/{dir}/**/*"))
                .collect(),
            AssetClass::Icons => vec!["src/icons/**/*.svg".to_string()],
        }
    }

    /// Compile the class globs into a matcher.
    pub fn glob_set(&self) -> Result<GlobSet> {
        build_glob_set(&self.glob_patterns())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetClass::Scripts => "scripts",
            AssetClass::Styles => "styles",
            AssetClass::Statics => "assets",
            AssetClass::Icons => "icons",
        }
    }
}

/// Compile a list of root-relative glob patterns into a `GlobSet`.
pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("building glob set")
}

/// Map a removed source path to its derived output artifact.
///
/// The mapping is a pure rewrite of path prefix and extension, so it works
/// even when the artifact was produced by a prior process invocation:
///
/// - `src/scripts/theme.js`   -> `dist/assets/theme.js`
/// - `src/styles/theme.scss`  -> `dist/assets/theme.css`
/// - `src/icons/arrow.svg`    -> `dist/snippets/arrow.liquid`
/// - `src/templates/cart.liquid` -> `dist/templates/cart.liquid`
///
/// Returns `None` when the path does not belong to the class (e.g. a script
/// without a file name).
pub fn output_artifact(class: AssetClass, rel_source: &Path) -> Option<PathBuf> {
    match class {
        AssetClass::Scripts => {
            let name = rel_source.file_name()?;
            Some(Path::new(DIST_ASSETS).join(name))
        }
        AssetClass::Styles => {
            let name = rel_source.file_name()?;
            let out = Path::new(DIST_ASSETS).join(name).with_extension("css");
            Some(out)
        }
        AssetClass::Statics => {
            let rel = rel_source.strip_prefix(SRC_ROOT).ok()?;
            Some(Path::new(DIST_ROOT).join(rel))
        }
        AssetClass::Icons => {
            let name = rel_source.file_name()?;
            let out = Path::new(DIST_SNIPPETS).join(name).with_extension("liquid");
            Some(out)
        }
    }
}

/// Absolute path helpers anchored at a project root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_root(&self) -> PathBuf {
        self.root.join(SRC_ROOT)
    }

    pub fn dist_root(&self) -> PathBuf {
        self.root.join(DIST_ROOT)
    }

    pub fn tmp_root(&self) -> PathBuf {
        self.root.join(TMP_ROOT)
    }

    pub fn upload_root(&self) -> PathBuf {
        self.root.join(UPLOAD_ROOT)
    }

    pub fn dist_assets(&self) -> PathBuf {
        self.root.join(DIST_ASSETS)
    }

    pub fn dist_snippets(&self) -> PathBuf {
        self.root.join(DIST_SNIPPETS)
    }

    /// Resolve a root-relative path to an absolute one.
    pub fn resolve(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_removal_mapping_is_pure_and_deterministic() {
        let rel = Path::new("src/icons/arrow.svg");
        let first = output_artifact(AssetClass::Icons, rel).unwrap();
        let second = output_artifact(AssetClass::Icons, rel).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Path::new("dist/snippets/arrow.liquid"));
    }

    #[test]
    fn style_mapping_swaps_extension() {
        let out = output_artifact(AssetClass::Styles, Path::new("src/styles/theme.scss")).unwrap();
        assert_eq!(out, Path::new("dist/assets/theme.css"));

        let out = output_artifact(AssetClass::Styles, Path::new("src/styles/base.css")).unwrap();
        assert_eq!(out, Path::new("dist/assets/base.css"));
    }

    #[test]
    fn static_mapping_rewrites_the_root_prefix() {
        let out =
            output_artifact(AssetClass::Statics, Path::new("src/templates/cart.liquid")).unwrap();
        assert_eq!(out, Path::new("dist/templates/cart.liquid"));
    }

    #[test]
    fn class_globs_match_their_own_sources_only() {
        let scripts = AssetClass::Scripts.glob_set().unwrap();
        assert!(scripts.is_match("src/scripts/theme.js"));
        assert!(!scripts.is_match("src/styles/theme.scss"));

        let styles = AssetClass::Styles.glob_set().unwrap();
        assert!(styles.is_match("src/styles/theme.scss"));
        assert!(styles.is_match("src/styles/vendor/reset.css"));

        let icons = AssetClass::Icons.glob_set().unwrap();
        assert!(icons.is_match("src/icons/arrow.svg"));
        assert!(!icons.is_match("src/icons/readme.md"));
    }
}

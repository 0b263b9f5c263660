// src/assets/mod.rs

//! Per-class asset processors.
//!
//! Each asset class (scripts, styles, static assets, icons) implements the
//! [`AssetProcessor`] contract independently; the orchestration core depends
//! only on the contract, never on a transform's internals. The concrete
//! transforms here are deliberately simple leaf processors and are the
//! natural place to swap in heavier tooling.
//!
//! Contract rules:
//! - `process`/`remove` accept root-relative source paths and may be called
//!   with only the delta produced by a watch flush, never assume a complete
//!   source set.
//! - An empty input set is a no-op success.
//! - Per-file failures are recorded in the [`ErrorCollector`] and processing
//!   continues; only infrastructure failures (e.g. the output root cannot be
//!   created) surface as `Err`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::SystemTime;

use anyhow::Context;
use tracing::debug;

use crate::config::paths::{AssetClass, ProjectPaths};
use crate::errors::Result;
use crate::report::ErrorCollector;

pub mod copy;
pub mod icons;
pub mod scripts;
pub mod statics;
pub mod styles;

pub use icons::IconProcessor;
pub use scripts::ScriptProcessor;
pub use statics::StaticProcessor;
pub use styles::StyleProcessor;

/// Boxed future used to keep the processor trait dyn-compatible.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One instance per asset class. Implementations must be idempotent:
/// re-processing identical inputs yields identical artifacts, because watch
/// sessions invoke the same actions repeatedly.
pub trait AssetProcessor: Send + Sync {
    fn class(&self) -> AssetClass;

    /// Regenerate output artifacts for the given source paths.
    fn process(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>>;

    /// Delete the artifacts derived from the given (now removed) source
    /// paths. The source -> artifact mapping is pure, so this works even for
    /// artifacts produced by a prior process invocation.
    fn remove(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>>;
}

/// The full per-class processor set for one invocation.
///
/// Each processor owns a disjoint output subtree (`dist/assets`,
/// `dist/snippets`, the static `dist/` subtrees), so they are safe to run
/// under `parallel` composition without write races.
pub struct Processors {
    pub scripts: std::sync::Arc<dyn AssetProcessor>,
    pub styles: std::sync::Arc<dyn AssetProcessor>,
    pub statics: std::sync::Arc<dyn AssetProcessor>,
    pub icons: std::sync::Arc<dyn AssetProcessor>,
}

impl Processors {
    pub fn new(
        paths: &ProjectPaths,
        js_inputs: Vec<String>,
        optimize: bool,
        collector: &ErrorCollector,
    ) -> Self {
        Self {
            scripts: std::sync::Arc::new(ScriptProcessor::new(
                paths.clone(),
                js_inputs,
                collector.clone(),
            )),
            styles: std::sync::Arc::new(StyleProcessor::new(
                paths.clone(),
                optimize,
                collector.clone(),
            )),
            statics: std::sync::Arc::new(StaticProcessor::new(paths.clone(), collector.clone())),
            icons: std::sync::Arc::new(IconProcessor::new(paths.clone(), collector.clone())),
        }
    }

    pub fn for_class(&self, class: AssetClass) -> std::sync::Arc<dyn AssetProcessor> {
        match class {
            AssetClass::Scripts => std::sync::Arc::clone(&self.scripts),
            AssetClass::Styles => std::sync::Arc::clone(&self.styles),
            AssetClass::Statics => std::sync::Arc::clone(&self.statics),
            AssetClass::Icons => std::sync::Arc::clone(&self.icons),
        }
    }
}

/// Walk the source tree and collect the root-relative paths matching the
/// given class globs. Used to seed full builds; watch flushes pass deltas
/// directly.
pub fn collect_class_sources(paths: &ProjectPaths, class: AssetClass) -> Result<Vec<PathBuf>> {
    let glob_set = class.glob_set().map_err(crate::errors::LeafError::Other)?;
    let mut found = Vec::new();
    let src_root = paths.src_root();
    if !src_root.is_dir() {
        return Ok(found);
    }
    walk_into(paths.root(), &src_root, &mut |rel| {
        if glob_set.is_match(rel) {
            found.push(rel.to_path_buf());
        }
    })?;
    found.sort();
    Ok(found)
}

fn walk_into(
    root: &Path,
    dir: &Path,
    visit: &mut impl FnMut(&Path),
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        // Dotfiles are ignored by convention, both here and in the watcher.
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            walk_into(root, &path, visit)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            visit(rel);
        }
    }
    Ok(())
}

/// Delete a derived artifact, tolerating its absence.
pub(crate) fn remove_artifact(
    abs_artifact: &Path,
    source_label: &str,
    collector: &ErrorCollector,
) {
    match std::fs::remove_file(abs_artifact) {
        Ok(()) => debug!(artifact = ?abs_artifact, "removed artifact"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(artifact = ?abs_artifact, "artifact already absent");
        }
        Err(err) => {
            collector.record(source_label, format!("removing {:?}: {err}", abs_artifact));
        }
    }
}

/// Bump mtimes of artifacts matching `pattern` under `dir` so a downstream
/// serve watcher notices the rewrite even when content is unchanged.
pub(crate) fn touch_artifacts(dir: &Path, extension: &str) -> anyhow::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let now = SystemTime::now();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {:?}", dir))? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let file = std::fs::File::options()
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {:?} for touch", path))?;
        file.set_modified(now)
            .with_context(|| format!("touching {:?}", path))?;
        debug!(artifact = ?path, "touched artifact");
    }
    Ok(())
}

// src/assets/scripts.rs

//! Script processor.
//!
//! Bundling/minification is a swappable leaf concern; this processor stages
//! the configured entry points into `dist/assets` and bumps artifact mtimes
//! afterwards so the serve watcher picks up the rewrite.

use std::path::PathBuf;

use tracing::debug;

use crate::assets::{touch_artifacts, AssetProcessor, BoxFuture};
use crate::config::paths::{output_artifact, AssetClass, ProjectPaths};
use crate::errors::Result;
use crate::report::{self, ErrorCollector};

pub struct ScriptProcessor {
    paths: ProjectPaths,
    /// Root-relative entry points from `[build.js].inputs`.
    inputs: Vec<PathBuf>,
    collector: ErrorCollector,
}

impl ScriptProcessor {
    pub fn new(paths: ProjectPaths, inputs: Vec<String>, collector: ErrorCollector) -> Self {
        Self {
            paths,
            inputs: inputs.into_iter().map(PathBuf::from).collect(),
            collector,
        }
    }

    /// A change anywhere in the scripts tree invalidates every bundle, so
    /// all entry points are restaged regardless of which path changed.
    fn rebuild_inputs(&self) -> Result<()> {
        report::log_process_files("build:js");
        let dist_assets = self.paths.dist_assets();
        std::fs::create_dir_all(&dist_assets)?;

        for input in &self.inputs {
            let Some(rel_out) = output_artifact(AssetClass::Scripts, input) else {
                continue;
            };
            let abs_src = self.paths.resolve(input);
            let abs_out = self.paths.resolve(&rel_out);
            match std::fs::copy(&abs_src, &abs_out) {
                Ok(bytes) => debug!(input = ?input, bytes, "staged script bundle"),
                Err(err) => {
                    self.collector
                        .record("build:js", format!("bundling {:?}: {err}", input));
                }
            }
        }

        if let Err(err) = touch_artifacts(&dist_assets, "js") {
            self.collector.record("build:js", err);
        }
        Ok(())
    }
}

impl AssetProcessor for ScriptProcessor {
    fn class(&self) -> AssetClass {
        AssetClass::Scripts
    }

    fn process(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            self.rebuild_inputs()
        })
    }

    fn remove(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            report::log_process_files("remove:js");
            for rel in &paths {
                if let Some(artifact) = output_artifact(AssetClass::Scripts, rel) {
                    let abs = self.paths.resolve(&artifact);
                    super::remove_artifact(&abs, "remove:js", &self.collector);
                }
            }
            Ok(())
        })
    }
}

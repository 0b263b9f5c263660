// src/assets/styles.rs

//! Style processor: Sass compilation and CSS pass-through.
//!
//! Root stylesheets are the non-partial files directly under `src/styles/`;
//! partials (leading underscore) and anything in subdirectories only feed
//! into them. A change to any style source recompiles all roots, because a
//! partial cannot be mapped back to its importers without a dependency
//! graph, which is out of scope.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::assets::{touch_artifacts, AssetProcessor, BoxFuture};
use crate::config::paths::{output_artifact, AssetClass, ProjectPaths};
use crate::errors::Result;
use crate::report::{self, ErrorCollector};

pub struct StyleProcessor {
    paths: ProjectPaths,
    optimize: bool,
    collector: ErrorCollector,
}

impl StyleProcessor {
    pub fn new(paths: ProjectPaths, optimize: bool, collector: ErrorCollector) -> Self {
        Self {
            paths,
            optimize,
            collector,
        }
    }

    fn grass_options(&self) -> grass::Options<'_> {
        let style = if self.optimize {
            grass::OutputStyle::Compressed
        } else {
            grass::OutputStyle::Expanded
        };
        grass::Options::default().style(style)
    }

    fn root_stylesheets(&self) -> Result<Vec<PathBuf>> {
        let styles_dir = self.paths.resolve("src/styles");
        let mut roots = Vec::new();
        if !styles_dir.is_dir() {
            return Ok(roots);
        }
        for entry in std::fs::read_dir(&styles_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('_') || name.starts_with('.') {
                continue;
            }
            match path.extension().and_then(|e| e.to_str()) {
                Some("scss") | Some("css") => roots.push(path),
                _ => {}
            }
        }
        roots.sort();
        Ok(roots)
    }

    fn rebuild_roots(&self) -> Result<()> {
        report::log_process_files("build:css");
        let dist_assets = self.paths.dist_assets();
        std::fs::create_dir_all(&dist_assets)?;

        for root in self.root_stylesheets()? {
            if let Err(err) = self.compile_one(&root, &dist_assets) {
                self.collector
                    .record("build:css", format!("{}: {err}", root.display()));
            }
        }

        if let Err(err) = touch_artifacts(&dist_assets, "css") {
            self.collector.record("build:css", err);
        }
        Ok(())
    }

    fn compile_one(&self, root: &Path, dist_assets: &Path) -> anyhow::Result<()> {
        let stem = root
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("stylesheet without a file name"))?;
        let out = dist_assets.join(stem).with_extension("css");

        match root.extension().and_then(|e| e.to_str()) {
            Some("scss") => {
                let css = grass::from_path(root, &self.grass_options())
                    .map_err(|err| anyhow::anyhow!("{err}"))?;
                std::fs::write(&out, css)?;
            }
            _ => {
                std::fs::copy(root, &out)?;
            }
        }
        debug!(root = ?root, out = ?out, "compiled stylesheet");
        Ok(())
    }
}

impl AssetProcessor for StyleProcessor {
    fn class(&self) -> AssetClass {
        AssetClass::Styles
    }

    fn process(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            self.rebuild_roots()
        })
    }

    fn remove(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            report::log_process_files("remove:css");
            for rel in &paths {
                // Partials have no artifact of their own.
                if rel
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with('_'))
                    .unwrap_or(true)
                {
                    continue;
                }
                if let Some(artifact) = output_artifact(AssetClass::Styles, rel) {
                    let abs = self.paths.resolve(&artifact);
                    super::remove_artifact(&abs, "remove:css", &self.collector);
                }
            }
            Ok(())
        })
    }
}

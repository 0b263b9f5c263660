// src/assets/icons.rs

//! Icon processor: SVG sources become liquid snippets under
//! `dist/snippets/`.

use std::path::PathBuf;

use tracing::debug;

use crate::assets::{AssetProcessor, BoxFuture};
use crate::config::paths::{output_artifact, AssetClass, ProjectPaths};
use crate::errors::Result;
use crate::report::{self, ErrorCollector};

pub struct IconProcessor {
    paths: ProjectPaths,
    collector: ErrorCollector,
}

impl IconProcessor {
    pub fn new(paths: ProjectPaths, collector: ErrorCollector) -> Self {
        Self { paths, collector }
    }

    /// Convert one SVG into a snippet. The markup transform itself is a
    /// swappable leaf step; the snippet currently carries the SVG verbatim.
    fn convert_one(&self, rel: &PathBuf) -> anyhow::Result<()> {
        let Some(snippet_rel) = output_artifact(AssetClass::Icons, rel) else {
            return Ok(());
        };
        let abs_src = self.paths.resolve(rel);
        let abs_out = self.paths.resolve(&snippet_rel);
        let markup = std::fs::read_to_string(&abs_src)?;
        if let Some(parent) = abs_out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&abs_out, markup)?;
        debug!(icon = ?rel, snippet = ?snippet_rel, "converted icon");
        Ok(())
    }
}

impl AssetProcessor for IconProcessor {
    fn class(&self) -> AssetClass {
        AssetClass::Icons
    }

    fn process(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            report::log_process_files("build:svg");
            for rel in &paths {
                if let Err(err) = self.convert_one(rel) {
                    self.collector
                        .record("build:svg", format!("{}: {err}", rel.display()));
                }
            }
            Ok(())
        })
    }

    fn remove(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            report::log_process_files("remove:svg");
            for rel in &paths {
                if let Some(artifact) = output_artifact(AssetClass::Icons, rel) {
                    let abs = self.paths.resolve(&artifact);
                    super::remove_artifact(&abs, "remove:svg", &self.collector);
                }
            }
            Ok(())
        })
    }
}

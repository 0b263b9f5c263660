// src/assets/statics.rs

//! Static asset processor: verbatim copies from `src/` subtrees to the
//! matching `dist/` subtrees.

use std::path::PathBuf;

use crate::assets::{copy::copy_file, AssetProcessor, BoxFuture};
use crate::config::paths::{output_artifact, AssetClass, ProjectPaths};
use crate::errors::Result;
use crate::report::{self, ErrorCollector};

pub struct StaticProcessor {
    paths: ProjectPaths,
    collector: ErrorCollector,
}

impl StaticProcessor {
    pub fn new(paths: ProjectPaths, collector: ErrorCollector) -> Self {
        Self { paths, collector }
    }
}

impl AssetProcessor for StaticProcessor {
    fn class(&self) -> AssetClass {
        AssetClass::Statics
    }

    fn process(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if paths.is_empty() {
                return Ok(());
            }
            report::log_process_files("build:assets");
            std::fs::create_dir_all(self.paths.dist_root())?;

            for rel in &paths {
                let Some(dest_rel) = output_artifact(AssetClass::Statics, rel) else {
                    continue;
                };
                let abs_src = self.paths.resolve(rel);
                if !abs_src.is_file() {
                    continue;
                }
                let abs_dest = self.paths.resolve(&dest_rel);
                if let Err(err) = copy_file(&abs_src, &abs_dest) {
                    self.collector
                        .record("build:assets", format!("copying {:?}: {err}", rel));
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
            report::log_process_files("remove:assets");
            for rel in &paths {
                if let Some(artifact) = output_artifact(AssetClass::Statics, rel) {
                    let abs = self.paths.resolve(&artifact);
                    super::remove_artifact(&abs, "remove:assets", &self.collector);
                }
            }
            Ok(())
        })
    }
}

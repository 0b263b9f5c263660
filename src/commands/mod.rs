// src/commands/mod.rs

//! Explicit registry of named command modules, one per CLI subcommand.
//!
//! Each command assembles its own task graph as a value and hands it to a
//! [`Scheduler`](crate::graph::Scheduler); nothing is registered through
//! import-time side effects. Shared stage registrations live here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::assets::{collect_class_sources, Processors};
use crate::config::paths::{AssetClass, ProjectPaths, STATIC_DIRS};
use crate::config::{loader, ProjectConfig};
use crate::errors::Result;
use crate::graph::{StageKind, TaskGraph};
use crate::report::ErrorCollector;
use crate::sync::Destination;

pub mod build;
pub mod deploy;
pub mod pull;
pub mod watch;
pub mod zip;

/// Everything one invocation operates on: the validated config, the path
/// conventions anchored at the project root, and the invocation-scoped
/// error collector.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
    pub paths: ProjectPaths,
    pub collector: ErrorCollector,
}

impl Project {
    /// Load and validate the config file, anchoring paths at its parent
    /// directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = loader::load_and_validate(config_path)?;
        let root = config_root_dir(config_path);
        Ok(Self {
            config,
            paths: ProjectPaths::new(root),
            collector: ErrorCollector::new(),
        })
    }

    /// Resolve the remote destination for a store/environment pair.
    /// An explicit password flag wins over the one in the config.
    pub fn destination(
        &self,
        store_flag: Option<&str>,
        environment: &str,
        password_flag: Option<&str>,
    ) -> Result<Destination> {
        let store = self.config.resolve_store(store_flag)?;
        Ok(Destination {
            store: store.domain.clone(),
            environment: environment.to_string(),
            theme_id: self.config.theme_id(store, environment),
            password: password_flag
                .map(str::to_string)
                .or_else(|| store.password.clone()),
        })
    }
}

/// Figure out a sensible project root from the config path.
///
/// - If the config path has a non-empty parent (e.g. "project/leaf.toml"),
///   we use that directory.
/// - If it's just a bare filename like "leaf.toml" (parent = ""), we fall
///   back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Stage name for a class's build task.
pub fn build_task_name(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Scripts => "build:js",
        AssetClass::Styles => "build:css",
        AssetClass::Statics => "build:assets",
        AssetClass::Icons => "build:svg",
    }
}

/// Register the core build stages:
///
/// `build` = `clean` -> { `build:js`, `build:css`, `build:assets`,
/// `build:svg` in parallel }. `clean` is an infrastructure stage (its
/// failure aborts the run); the class stages are data stages.
pub fn register_build_tasks(graph: &mut TaskGraph, project: &Project, processors: &Processors) {
    let paths = project.paths.clone();
    graph.register("clean", StageKind::Infrastructure, move || {
        let paths = paths.clone();
        async move { clean_outputs(&paths) }
    });

    let mut class_tasks = Vec::new();
    for class in AssetClass::ALL {
        let task = build_task_name(class);
        class_tasks.push(task);

        let processor = processors.for_class(class);
        let paths = project.paths.clone();
        graph.register(task, StageKind::Data, move || {
            let processor = Arc::clone(&processor);
            let paths = paths.clone();
            async move {
                let sources = collect_class_sources(&paths, class)?;
                processor.process(sources).await
            }
        });
    }

    graph.parallel("build:all", &class_tasks);
    graph.sequence("build", &["clean", "build:all"]);
}

/// Register the terminal `output:errors` task: prints the consolidated
/// error block if the collector is non-empty, otherwise a no-op success.
/// The non-zero process outcome is derived from the collector's lifetime
/// total, which draining does not reset.
pub fn register_report_task(graph: &mut TaskGraph, collector: &ErrorCollector) {
    let collector = collector.clone();
    graph.register("output:errors", StageKind::Data, move || {
        let collector = collector.clone();
        async move {
            collector.drain_and_report();
            Ok(())
        }
    });
}

/// Remove the derived trees (`dist/`, `tmp/`, `upload/`) and stray zip
/// archives before a full rebuild.
fn clean_outputs(paths: &ProjectPaths) -> Result<()> {
    for dir in [paths.dist_root(), paths.tmp_root(), paths.upload_root()] {
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => debug!(dir = ?dir, "removed output tree"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }

    for dir in [paths.root().to_path_buf(), paths.src_root()] {
        if !dir.is_dir() {
            continue;
        }
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("zip") {
                std::fs::remove_file(&path)?;
                debug!(path = ?path, "removed stray archive");
            }
        }
    }

    Ok(())
}

/// Root-relative glob patterns covering all static subtrees, shared by the
/// tmp-generation task.
pub fn static_tree_globs() -> Vec<String> {
    STATIC_DIRS
        .iter()
        .map(|dir| format!("src/{dir}/**/*"))
        .collect()
}

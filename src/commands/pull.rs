// src/commands/pull.rs

//! `pull` - bring remote theme files back into the source tree.
//!
//! Settings-only mode (the default) never lets the remote overwrite source
//! code: it stages the remote theme in `tmp/`, copies only the settings
//! subset (templates, config, locales, section/block JSON) back into
//! `src/`, and cleans up. `--all` pulls the full theme straight into
//! `src/`.

use std::sync::Arc;

use crate::assets::{copy::copy_matching, Processors};
use crate::commands::{register_build_tasks, register_report_task, static_tree_globs, Project};
use crate::config::paths::{SETTINGS_GLOBS, SRC_ROOT, TMP_ROOT};
use crate::errors::Result;
use crate::graph::{RunOutcome, Scheduler, StageKind, TaskGraph};
use crate::report;
use crate::sync::{DeleteMode, SyncGateway};

pub struct PullOptions {
    pub environment: String,
    pub store: Option<String>,
    pub all: bool,
    pub delete: bool,
}

pub async fn run(
    project: &Project,
    gateway: Arc<dyn SyncGateway>,
    options: PullOptions,
) -> Result<RunOutcome> {
    let destination = project.destination(options.store.as_deref(), &options.environment, None)?;
    let delete_mode = if options.delete {
        DeleteMode::Delete
    } else {
        DeleteMode::Preserve
    };

    // The build stages are only needed for `clean` registration, but the
    // graph value carries them without cost.
    let processors = Processors::new(
        &project.paths,
        project.config.build().js.inputs.clone(),
        false,
        &project.collector,
    );

    let mut graph = TaskGraph::new();
    register_build_tasks(&mut graph, project, &processors);
    register_report_task(&mut graph, &project.collector);

    if options.all {
        let gateway = Arc::clone(&gateway);
        let destination = destination.clone();
        let src_root = project.paths.src_root();
        graph.register("pull:origin:src", StageKind::Infrastructure, move || {
            gateway.pull(destination.clone(), src_root.clone(), delete_mode)
        });

        let scheduler = Scheduler::new(graph, project.collector.clone())?;
        scheduler.run("pull:origin:src").await?;
        return scheduler.run("output:errors").await;
    }

    {
        let paths = project.paths.clone();
        let collector = project.collector.clone();
        graph.register("generate:tmp", StageKind::Data, move || {
            let paths = paths.clone();
            let collector = collector.clone();
            async move {
                report::log_process_files("generate:tmp");
                copy_matching(
                    &paths,
                    &static_tree_globs(),
                    SRC_ROOT,
                    TMP_ROOT,
                    &collector,
                    "generate:tmp",
                )?;
                Ok(())
            }
        });
    }

    {
        let gateway = Arc::clone(&gateway);
        let destination = destination.clone();
        let tmp_root = project.paths.tmp_root();
        graph.register("pull:origin:tmp", StageKind::Infrastructure, move || {
            gateway.pull(destination.clone(), tmp_root.clone(), delete_mode)
        });
    }

    {
        let paths = project.paths.clone();
        let collector = project.collector.clone();
        graph.register("sync-settings:tmp:src", StageKind::Data, move || {
            let paths = paths.clone();
            let collector = collector.clone();
            async move {
                report::log_process_files("sync-settings:tmp:src");
                let settings: Vec<String> =
                    SETTINGS_GLOBS.iter().map(|g| g.to_string()).collect();
                copy_matching(
                    &paths,
                    &settings,
                    TMP_ROOT,
                    SRC_ROOT,
                    &collector,
                    "sync-settings:tmp:src",
                )?;
                Ok(())
            }
        });
    }

    graph.sequence(
        "pull:settings",
        &[
            "generate:tmp",
            "pull:origin:tmp",
            "sync-settings:tmp:src",
            "clean",
        ],
    );

    let scheduler = Scheduler::new(graph, project.collector.clone())?;
    scheduler.run("pull:settings").await?;
    scheduler.run("output:errors").await
}

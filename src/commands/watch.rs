// src/commands/watch.rs

//! `watch` - full build, then rebuild incrementally on source changes while
//! the sync gateway serves a development preview.

use std::sync::Arc;

use tracing::info;

use crate::assets::Processors;
use crate::commands::{register_build_tasks, register_report_task, Project};
use crate::errors::Result;
use crate::graph::{RunOutcome, Scheduler, TaskGraph};
use crate::sync::SyncGateway;
use crate::watch::WatchSession;

pub struct WatchOptions {
    pub store: Option<String>,
    pub store_password: Option<String>,
    pub optimize: bool,
}

pub async fn run(
    project: &Project,
    gateway: Arc<dyn SyncGateway>,
    options: WatchOptions,
) -> Result<RunOutcome> {
    let destination = project.destination(
        options.store.as_deref(),
        "development",
        options.store_password.as_deref(),
    )?;

    let processors = Processors::new(
        &project.paths,
        project.config.build().js.inputs.clone(),
        options.optimize,
        &project.collector,
    );

    let mut graph = TaskGraph::new();
    register_build_tasks(&mut graph, project, &processors);
    register_report_task(&mut graph, &project.collector);

    let scheduler = Scheduler::new(graph, project.collector.clone())?;
    scheduler.run("build").await?;
    scheduler.run("output:errors").await?;

    let _session = WatchSession::start(&project.paths, &processors, &project.collector)?;
    info!(destination = %destination, "watching for source changes");

    tokio::select! {
        result = gateway.serve(destination) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received; shutting down");
        }
    }

    Ok(RunOutcome::Clean)
}

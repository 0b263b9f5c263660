// src/commands/deploy.rs

//! `deploy` - full (re)build, push dist to the configured theme, then
//! clean up the derived trees.

use std::sync::Arc;

use crate::assets::Processors;
use crate::commands::{register_build_tasks, register_report_task, Project};
use crate::errors::Result;
use crate::graph::{RunOutcome, Scheduler, StageKind, TaskGraph};
use crate::report;
use crate::sync::{DeleteMode, SyncGateway};

pub struct DeployOptions {
    pub environment: String,
    pub store: Option<String>,
    pub dev: bool,
    pub delete: bool,
}

pub async fn run(
    project: &Project,
    gateway: Arc<dyn SyncGateway>,
    options: DeployOptions,
) -> Result<RunOutcome> {
    let destination = project.destination(options.store.as_deref(), &options.environment, None)?;
    let delete_mode = if options.delete {
        DeleteMode::Delete
    } else {
        DeleteMode::Preserve
    };

    report::log_process_files(&format!("deploy -> {destination}"));

    let processors = Processors::new(
        &project.paths,
        project.config.build().js.inputs.clone(),
        !options.dev,
        &project.collector,
    );

    let mut graph = TaskGraph::new();
    register_build_tasks(&mut graph, project, &processors);
    register_report_task(&mut graph, &project.collector);

    {
        let gateway = Arc::clone(&gateway);
        let destination = destination.clone();
        graph.register("push:dist", StageKind::Infrastructure, move || {
            gateway.push(destination.clone(), delete_mode)
        });
    }

    graph.sequence("deploy", &["build", "push:dist", "clean"]);

    let scheduler = Scheduler::new(graph, project.collector.clone())?;
    scheduler.run("deploy").await?;
    scheduler.run("output:errors").await
}

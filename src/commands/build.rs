// src/commands/build.rs

//! `build` - full clean/rebuild of the output tree.

use crate::assets::Processors;
use crate::commands::{register_build_tasks, register_report_task, Project};
use crate::errors::Result;
use crate::graph::{RunOutcome, Scheduler, TaskGraph};

pub async fn run(project: &Project, dev: bool) -> Result<RunOutcome> {
    let processors = Processors::new(
        &project.paths,
        project.config.build().js.inputs.clone(),
        !dev,
        &project.collector,
    );

    let mut graph = TaskGraph::new();
    register_build_tasks(&mut graph, project, &processors);
    register_report_task(&mut graph, &project.collector);

    let scheduler = Scheduler::new(graph, project.collector.clone())?;
    scheduler.run("build").await?;
    scheduler.run("output:errors").await
}

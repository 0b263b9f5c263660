// src/commands/zip.rs

//! `zip` - rebuild and package the output tree into a single archive,
//! staged under `upload/` for manual distribution.

use std::sync::Arc;

use crate::assets::{copy::copy_matching, Processors};
use crate::commands::{register_build_tasks, register_report_task, Project};
use crate::config::paths::{DIST_ROOT, UPLOAD_ROOT};
use crate::errors::Result;
use crate::graph::{RunOutcome, Scheduler, StageKind, TaskGraph};
use crate::report;
use crate::sync::SyncGateway;

pub async fn run(project: &Project, gateway: Arc<dyn SyncGateway>) -> Result<RunOutcome> {
    let processors = Processors::new(
        &project.paths,
        project.config.build().js.inputs.clone(),
        true,
        &project.collector,
    );

    let mut graph = TaskGraph::new();
    register_build_tasks(&mut graph, project, &processors);
    register_report_task(&mut graph, &project.collector);

    {
        let gateway = Arc::clone(&gateway);
        graph.register("package:dist", StageKind::Infrastructure, move || {
            gateway.package()
        });
    }

    {
        let paths = project.paths.clone();
        let collector = project.collector.clone();
        graph.register("copy:zip", StageKind::Data, move || {
            let paths = paths.clone();
            let collector = collector.clone();
            async move {
                report::log_process_files("copy:zip");
                let patterns = vec![format!("{DIST_ROOT}/*.zip")];
                copy_matching(
                    &paths,
                    &patterns,
                    DIST_ROOT,
                    UPLOAD_ROOT,
                    &collector,
                    "copy:zip",
                )?;
                Ok(())
            }
        });
    }

    graph.sequence("zip", &["build", "package:dist", "copy:zip"]);

    let scheduler = Scheduler::new(graph, project.collector.clone())?;
    scheduler.run("zip").await?;
    scheduler.run("output:errors").await
}

// src/graph/scheduler.rs

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::assets::BoxFuture;
use crate::errors::{LeafError, Result};
use crate::graph::node::{StageKind, TaskGraph, TaskNode};
use crate::report::ErrorCollector;

/// Outcome of a completed (non-aborted) graph run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage succeeded.
    Clean,
    /// At least one recoverable error was recorded; the run still ran to
    /// completion and the errors were (or will be) reported.
    HadErrors,
}

impl RunOutcome {
    pub fn had_errors(&self) -> bool {
        matches!(self, RunOutcome::HadErrors)
    }
}

/// Executes a [`TaskGraph`] rooted at a named task.
///
/// Execution semantics:
/// - `sequence` children run in listed order; a fatal (infrastructure)
///   failure aborts immediately, a data-stage failure is recorded in the
///   collector and the sequence continues.
/// - `parallel` children run concurrently; completion is the join of all of
///   them regardless of individual failure, and a child's failure never
///   cancels its siblings.
///
/// The scheduler receives its graph as a constructed value; nothing here is
/// registered through import-time side effects, so a graph can be tested in
/// isolation.
#[derive(Debug)]
pub struct Scheduler {
    graph: TaskGraph,
    collector: ErrorCollector,
}

impl Scheduler {
    /// Validate the graph (unknown references, cycles) and wrap it.
    pub fn new(graph: TaskGraph, collector: ErrorCollector) -> Result<Arc<Self>> {
        graph.validate()?;
        Ok(Arc::new(Self { graph, collector }))
    }

    pub fn collector(&self) -> &ErrorCollector {
        &self.collector
    }

    /// Run the graph from `root`.
    ///
    /// `Err` means the run was aborted by a fatal stage; `Ok(HadErrors)`
    /// means it completed with recoverable errors collected along the way.
    pub async fn run(self: &Arc<Self>, root: &str) -> Result<RunOutcome> {
        info!(task = root, "starting graph run");
        Arc::clone(self).run_node(root.to_string()).await?;

        let outcome = if self.collector.total_recorded() > 0 {
            RunOutcome::HadErrors
        } else {
            RunOutcome::Clean
        };
        info!(task = root, ?outcome, "graph run finished");
        Ok(outcome)
    }

    fn run_node(self: Arc<Self>, name: String) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            let node = self
                .graph
                .node(&name)
                .ok_or_else(|| LeafError::UnknownTask(name.clone()))?;

            match node {
                TaskNode::Action { kind, action } => {
                    debug!(task = %name, ?kind, "running action");
                    match action().await {
                        Ok(()) => Ok(()),
                        Err(err) => match kind {
                            StageKind::Data => {
                                // Recoverable: collect and let the run continue.
                                self.collector.record(&name, &err);
                                Ok(())
                            }
                            StageKind::Infrastructure => Err(LeafError::FatalStage {
                                stage: name.clone(),
                                message: err.to_string(),
                            }),
                        },
                    }
                }
                TaskNode::Sequence(children) => {
                    for child in children.clone() {
                        Arc::clone(&self).run_node(child).await?;
                    }
                    Ok(())
                }
                TaskNode::Parallel(children) => {
                    let mut set = JoinSet::new();
                    for child in children.clone() {
                        set.spawn(Arc::clone(&self).run_node(child));
                    }

                    // Join all children before surfacing any fatal error so
                    // siblings are never cancelled mid-write.
                    let mut fatal: Option<LeafError> = None;
                    while let Some(joined) = set.join_next().await {
                        match joined {
                            Ok(Ok(())) => {}
                            Ok(Err(err)) => {
                                warn!(task = %name, "parallel child failed fatally: {err}");
                                if fatal.is_none() {
                                    fatal = Some(err);
                                }
                            }
                            Err(join_err) => {
                                self.collector
                                    .record(&name, format!("task panicked: {join_err}"));
                            }
                        }
                    }

                    match fatal {
                        Some(err) => Err(err),
                        None => Ok(()),
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_graph() -> TaskGraph {
        TaskGraph::new()
    }

    #[tokio::test]
    async fn unknown_root_is_an_error() {
        let scheduler = Scheduler::new(noop_graph(), ErrorCollector::new()).unwrap();
        let err = scheduler.run("missing").await.unwrap_err();
        assert!(matches!(err, LeafError::UnknownTask(_)));
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut graph = noop_graph();

        graph.register("step", StageKind::Data, || async {
            Err(anyhow::anyhow!("first registration should be unreachable").into())
        });
        let c = Arc::clone(&counter);
        graph.register("step", StageKind::Data, move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let scheduler = Scheduler::new(graph, ErrorCollector::new()).unwrap();
        let outcome = scheduler.run("step").await.unwrap();
        assert_eq!(outcome, RunOutcome::Clean);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn self_referencing_sequence_is_rejected() {
        let mut graph = noop_graph();
        graph.sequence("loop", &["loop"]);
        assert!(Scheduler::new(graph, ErrorCollector::new()).is_err());
    }

    #[tokio::test]
    async fn mutually_recursive_compositions_are_rejected() {
        let mut graph = noop_graph();
        graph.sequence("a", &["b"]);
        graph.parallel("b", &["a"]);
        let err = Scheduler::new(graph, ErrorCollector::new()).unwrap_err();
        assert!(matches!(err, LeafError::GraphCycle(_)));
    }
}

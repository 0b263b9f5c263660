// tests/graph_semantics.rs

//! Run-ordering and failure-isolation behaviour of the task scheduler.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use leafbuild::errors::LeafError;
use leafbuild::graph::{RunOutcome, Scheduler, StageKind, TaskGraph};
use leafbuild::report::ErrorCollector;
use leafbuild_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// Shared log of which tasks actually ran, in completion order.
fn run_log() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn log_task(
    graph: &mut TaskGraph,
    name: &'static str,
    kind: StageKind,
    log: &Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
) {
    let log = Arc::clone(log);
    graph.register(name, kind, move || {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(name);
            if fail {
                Err(anyhow::anyhow!("{name} failed").into())
            } else {
                Ok(())
            }
        }
    });
}

#[tokio::test]
async fn sequence_runs_children_in_order() -> TestResult {
    init_tracing();
    let log = run_log();
    let mut graph = TaskGraph::new();
    log_task(&mut graph, "first", StageKind::Data, &log, false);
    log_task(&mut graph, "second", StageKind::Data, &log, false);
    log_task(&mut graph, "third", StageKind::Data, &log, false);
    graph.sequence("all", &["first", "second", "third"]);

    let scheduler = Scheduler::new(graph, ErrorCollector::new())?;
    let outcome = with_timeout(scheduler.run("all")).await?;

    assert_eq!(outcome, RunOutcome::Clean);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    Ok(())
}

#[tokio::test]
async fn recoverable_failure_lets_the_sequence_continue() -> TestResult {
    init_tracing();
    let log = run_log();
    let collector = ErrorCollector::new();
    let mut graph = TaskGraph::new();
    log_task(&mut graph, "broken", StageKind::Data, &log, true);
    log_task(&mut graph, "after", StageKind::Data, &log, false);
    graph.sequence("all", &["broken", "after"]);

    let scheduler = Scheduler::new(graph, collector.clone())?;
    let outcome = with_timeout(scheduler.run("all")).await?;

    assert_eq!(outcome, RunOutcome::HadErrors);
    assert_eq!(*log.lock().unwrap(), vec!["broken", "after"]);
    let errors = collector.drain();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source, "broken");
    Ok(())
}

#[tokio::test]
async fn fatal_failure_aborts_the_sequence() -> TestResult {
    init_tracing();
    let log = run_log();
    let mut graph = TaskGraph::new();
    log_task(&mut graph, "broken", StageKind::Infrastructure, &log, true);
    log_task(&mut graph, "after", StageKind::Data, &log, false);
    graph.sequence("all", &["broken", "after"]);

    let scheduler = Scheduler::new(graph, ErrorCollector::new())?;
    let err = with_timeout(scheduler.run("all")).await.unwrap_err();

    assert!(matches!(err, LeafError::FatalStage { ref stage, .. } if stage == "broken"));
    // The failing stage ran; nothing after it did.
    assert_eq!(*log.lock().unwrap(), vec!["broken"]);
    Ok(())
}

#[tokio::test]
async fn parallel_child_failure_never_cancels_siblings() -> TestResult {
    init_tracing();
    let collector = ErrorCollector::new();
    let sibling_finished = Arc::new(AtomicBool::new(false));

    let mut graph = TaskGraph::new();
    graph.register("failing", StageKind::Data, || async {
        Err(anyhow::anyhow!("one asset broke").into())
    });
    {
        let finished = Arc::clone(&sibling_finished);
        graph.register("slow-sibling", StageKind::Data, move || {
            let finished = Arc::clone(&finished);
            async move {
                tokio::task::yield_now().await;
                finished.store(true, Ordering::SeqCst);
                Ok(())
            }
        });
    }
    graph.parallel("both", &["failing", "slow-sibling"]);

    let scheduler = Scheduler::new(graph, collector.clone())?;
    let outcome = with_timeout(scheduler.run("both")).await?;

    assert_eq!(outcome, RunOutcome::HadErrors);
    assert!(sibling_finished.load(Ordering::SeqCst));
    assert_eq!(collector.len(), 1);
    Ok(())
}

#[tokio::test]
async fn fatal_parallel_child_surfaces_after_all_siblings_settle() -> TestResult {
    init_tracing();
    let sibling_finished = Arc::new(AtomicBool::new(false));

    let mut graph = TaskGraph::new();
    graph.register("fatal", StageKind::Infrastructure, || async {
        Err(anyhow::anyhow!("tooling gone").into())
    });
    {
        let finished = Arc::clone(&sibling_finished);
        graph.register("sibling", StageKind::Data, move || {
            let finished = Arc::clone(&finished);
            async move {
                tokio::task::yield_now().await;
                finished.store(true, Ordering::SeqCst);
                Ok(())
            }
        });
    }
    graph.parallel("both", &["fatal", "sibling"]);

    let scheduler = Scheduler::new(graph, ErrorCollector::new())?;
    let err = with_timeout(scheduler.run("both")).await.unwrap_err();

    assert!(matches!(err, LeafError::FatalStage { .. }));
    assert!(sibling_finished.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn unknown_composition_child_is_rejected_up_front() -> TestResult {
    init_tracing();
    let mut graph = TaskGraph::new();
    graph.sequence("all", &["missing"]);

    let err = Scheduler::new(graph, ErrorCollector::new()).unwrap_err();
    assert!(matches!(err, LeafError::UnknownTask(_)));
    Ok(())
}

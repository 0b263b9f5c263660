// src/graph/node.rs

//! Task registry and composition.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::assets::BoxFuture;
use crate::errors::{LeafError, Result};

/// Canonical task name type used throughout the graph.
pub type TaskName = String;

/// Boxed, re-runnable task action. Actions must be idempotent: watch
/// sessions invoke the same action repeatedly without manual cleanup.
pub type TaskAction = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Failure class of a task.
///
/// - `Data`: a failing action is recorded in the collector and the run
///   continues with the next sibling (a single asset failing to transform).
/// - `Infrastructure`: a failing action aborts the whole run immediately
///   (the clean step cannot remove the output tree, a required external
///   tool is missing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Data,
    Infrastructure,
}

/// A node in the task graph.
pub enum TaskNode {
    Action { kind: StageKind, action: TaskAction },
    /// Strict order; each child must settle before the next starts.
    Sequence(Vec<TaskName>),
    /// Concurrent children; completion is the join of all of them.
    Parallel(Vec<TaskName>),
}

impl fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskNode::Action { kind, .. } => f
                .debug_struct("Action")
                .field("kind", kind)
                .finish_non_exhaustive(),
            TaskNode::Sequence(children) => f.debug_tuple("Sequence").field(children).finish(),
            TaskNode::Parallel(children) => f.debug_tuple("Parallel").field(children).finish(),
        }
    }
}

/// Ordered collection of named tasks plus composition operators.
///
/// A node's identity is its name; registering the same name again
/// overwrites the previous node (last registration wins).
#[derive(Debug, Default)]
pub struct TaskGraph {
    nodes: HashMap<TaskName, TaskNode>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf action under `name`.
    pub fn register<F, Fut>(&mut self, name: &str, kind: StageKind, action: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let action: TaskAction = Arc::new(move || Box::pin(action()) as BoxFuture<'static, _>);
        self.nodes
            .insert(name.to_string(), TaskNode::Action { kind, action });
    }

    /// Register `name` as a strict-order composition of `children`.
    pub fn sequence(&mut self, name: &str, children: &[&str]) {
        self.nodes.insert(
            name.to_string(),
            TaskNode::Sequence(children.iter().map(|c| c.to_string()).collect()),
        );
    }

    /// Register `name` as a concurrent composition of `children`.
    pub fn parallel(&mut self, name: &str, children: &[&str]) {
        self.nodes.insert(
            name.to_string(),
            TaskNode::Parallel(children.iter().map(|c| c.to_string()).collect()),
        );
    }

    pub fn node(&self, name: &str) -> Option<&TaskNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Check that every composition child exists and that the composed
    /// references form no cycle.
    pub fn validate(&self) -> Result<()> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }

        for (name, node) in self.nodes.iter() {
            let children = match node {
                TaskNode::Action { .. } => continue,
                TaskNode::Sequence(children) | TaskNode::Parallel(children) => children,
            };
            for child in children {
                if !self.nodes.contains_key(child) {
                    return Err(LeafError::UnknownTask(format!(
                        "task '{name}' references unregistered task '{child}'"
                    )));
                }
                if child == name {
                    return Err(LeafError::GraphCycle(format!(
                        "task '{name}' contains itself"
                    )));
                }
                graph.add_edge(name.as_str(), child.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => {
                let node = cycle.node_id();
                Err(LeafError::GraphCycle(format!(
                    "cycle detected in task graph involving task '{node}'"
                )))
            }
        }
    }
}

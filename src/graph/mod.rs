// src/graph/mod.rs

//! Task graph and scheduling.
//!
//! - [`node`] holds the explicit task registry: named actions plus
//!   `sequence` / `parallel` composition nodes. Graphs are built once per
//!   invocation as plain values and handed to a scheduler, never mutated
//!   during execution and never registered through module-load side effects.
//! - [`scheduler`] executes a graph rooted at a named task, distinguishing
//!   recoverable data-stage failures (collected, run continues) from fatal
//!   infrastructure-stage failures (run aborts).

pub mod node;
pub mod scheduler;

pub use node::{StageKind, TaskGraph, TaskName, TaskNode};
pub use scheduler::{RunOutcome, Scheduler};

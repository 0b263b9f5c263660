// src/report.rs

//! Per-invocation error collection and user-facing output.
//!
//! The [`ErrorCollector`] is the one resource deliberately shared by
//! concurrently running build stages. It is created at the start of a
//! `build`/`zip` invocation and drained exactly once at the end; `watch`
//! sessions drain it after every rebuild cycle instead.
//!
//! Diagnostics go through `tracing` (stderr); the event lines and the
//! consolidated error block are user output and go to stdout, styled with
//! `console`.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use console::style;
use tracing::debug;

/// A single recoverable error captured during a build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    /// Name of the task or processor that recorded the error.
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source, self.message)
    }
}

/// Append-only error sink shared by all tasks of one invocation.
///
/// Clones share the same underlying storage. Appends from `parallel` stages
/// interleave in arbitrary order across tasks, but calls from the same task
/// keep their order.
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    entries: Arc<Mutex<Vec<BuildError>>>,
    /// Total errors recorded over the collector's lifetime; unlike
    /// `entries`, this survives draining so a run outcome can be derived
    /// after the terminal report task has already emptied the collector.
    total: Arc<AtomicUsize>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable error. Never fails; a poisoned lock means a
    /// sibling task panicked, and we still want the entry.
    pub fn record(&self, source: impl Into<String>, error: impl fmt::Display) {
        let entry = BuildError {
            source: source.into(),
            message: error.to_string(),
        };
        debug!(source = %entry.source, "collected error: {}", entry.message);
        let mut guard = match self.entries.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(entry);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    /// Total errors ever recorded in this invocation, including drained ones.
    pub fn total_recorded(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.lock().map(|g| g.is_empty()).unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read and clear all entries.
    pub fn drain(&self) -> Vec<BuildError> {
        let mut guard = match self.entries.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *guard)
    }

    /// Print the consolidated error block and clear the collector.
    ///
    /// Returns `true` if anything was reported, so callers can derive the
    /// process exit code from it.
    pub fn drain_and_report(&self) -> bool {
        let errors = self.drain();
        if errors.is_empty() {
            return false;
        }

        println!();
        println!("{}", style("There were errors during the build:").red());
        for err in &errors {
            println!("  {}", style(err).red());
        }
        println!();
        true
    }
}

/// Log a single file event in the `watch` session.
///
/// `external` marks events observed on the output tree (written by the sync
/// gateway or another tool) rather than on sources.
pub fn log_file_event(event: &str, path: &Path, external: bool) {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    if external {
        println!(
            "updated {} {} - {} {}",
            style("dist").green(),
            style(dir.display()).magenta(),
            style(event).cyan(),
            style(file).yellow(),
        );
    } else {
        println!(
            "change in {} - {} {}",
            style(dir.display()).magenta(),
            style(event).cyan(),
            style(file).yellow(),
        );
    }
}

/// Log the start of a processing step, e.g. `build:css`.
pub fn log_process_files(process_name: &str) {
    println!("running task - {}", style(process_name).cyan());
}

/// Log an external child-process invocation, e.g. a theme push.
pub fn log_child_process(cmd: &str) {
    println!(
        "running task {} - {}",
        style("[child process]").bold(),
        style(cmd).cyan(),
    );
}

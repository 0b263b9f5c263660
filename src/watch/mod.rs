// src/watch/mod.rs

//! File watching and debounced change batching.
//!
//! This module is responsible for:
//! - Bridging a cross-platform filesystem watcher (`notify`) into the async
//!   world, one subscription per asset class plus one over the output tree.
//! - Classifying raw events into `changed` / `removed` with a caller-supplied
//!   kind vocabulary (`EventClasses`).
//! - Coalescing event bursts behind a quiet-period timer and flushing them to
//!   the bound asset processor (`debounce`).
//!
//! It does **not** know how any asset class is transformed; it only turns
//! filesystem changes into batched processor calls.

use std::path::PathBuf;
use std::time::{Duration, Instant};

pub mod cache;
pub mod debounce;
pub mod session;
pub mod watcher;

pub use cache::{EventCache, FlushBatch};
pub use debounce::{spawn_debouncer, DebouncerHandle};
pub use session::WatchSession;
pub use watcher::{spawn_class_watcher, spawn_dist_watcher, WatcherHandle};

/// Quiet period after which accumulated events are flushed as one batch.
///
/// The timer restarts on every new event, so a continuous stream of events
/// delays the flush; batching is preferred over latency.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(320);

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileEventKind {
    Added,
    Modified,
    Removed,
}

impl FileEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            FileEventKind::Added => "add",
            FileEventKind::Modified => "change",
            FileEventKind::Removed => "unlink",
        }
    }
}

/// A single file-change notification, produced by the watcher and consumed
/// by the [`EventCache`].
#[derive(Debug, Clone)]
pub struct FileEvent {
    pub kind: FileEventKind,
    /// Path relative to the project root, forward slashes.
    pub path: PathBuf,
    pub timestamp: Instant,
}

impl FileEvent {
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Instant::now(),
        }
    }
}

/// Caller-supplied partition of event kinds into the `changed` and `removed`
/// vocabularies.
///
/// Different watchers can define their own split; the default treats `add`
/// and `change` as changed and `unlink` as removed.
#[derive(Debug, Clone)]
pub struct EventClasses {
    pub changed_kinds: Vec<FileEventKind>,
    pub removed_kinds: Vec<FileEventKind>,
}

impl Default for EventClasses {
    fn default() -> Self {
        Self {
            changed_kinds: vec![FileEventKind::Added, FileEventKind::Modified],
            removed_kinds: vec![FileEventKind::Removed],
        }
    }
}

impl EventClasses {
    pub fn is_changed(&self, kind: FileEventKind) -> bool {
        self.changed_kinds.contains(&kind)
    }

    pub fn is_removed(&self, kind: FileEventKind) -> bool {
        self.removed_kinds.contains(&kind)
    }
}

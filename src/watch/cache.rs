// src/watch/cache.rs

//! Debounced file-event cache.
//!
//! An [`EventCache`] accumulates events between flushes as two disjoint path
//! sets, `changed` and `removed`. The last event for a path within a window
//! wins: a removal following a change clears the path from `changed`, and
//! vice versa. The timer lives in [`debounce`](crate::watch::debounce); this
//! type is a plain state machine so the coalescing behaviour is testable
//! without mocking timers.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::watch::{EventClasses, FileEvent};

/// One flushed batch of classified paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushBatch {
    pub changed: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl FlushBatch {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Accumulates classified events for one watcher subscription.
#[derive(Debug)]
pub struct EventCache {
    classes: EventClasses,
    changed: BTreeSet<PathBuf>,
    removed: BTreeSet<PathBuf>,
}

impl EventCache {
    pub fn new(classes: EventClasses) -> Self {
        Self {
            classes,
            changed: BTreeSet::new(),
            removed: BTreeSet::new(),
        }
    }

    /// Record an event. Unrecognised kinds are ignored.
    ///
    /// Invariant: a path never sits in both sets; the most recent
    /// classification for a path replaces the previous one.
    pub fn add_event(&mut self, event: &FileEvent) {
        if self.classes.is_changed(event.kind) {
            self.removed.remove(&event.path);
            self.changed.insert(event.path.clone());
        } else if self.classes.is_removed(event.kind) {
            self.changed.remove(&event.path);
            self.removed.insert(event.path.clone());
        } else {
            debug!(kind = ?event.kind, path = ?event.path, "unclassified event kind; ignoring");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }

    /// Drain the accumulated sets, clearing the cache unconditionally.
    pub fn take(&mut self) -> FlushBatch {
        let changed = std::mem::take(&mut self.changed).into_iter().collect();
        let removed = std::mem::take(&mut self.removed).into_iter().collect();
        FlushBatch { changed, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::FileEventKind;

    fn cache() -> EventCache {
        EventCache::new(EventClasses::default())
    }

    #[test]
    fn last_event_per_path_wins() {
        let mut cache = cache();
        cache.add_event(&FileEvent::new(FileEventKind::Added, "src/icons/arrow.svg"));
        cache.add_event(&FileEvent::new(FileEventKind::Removed, "src/icons/arrow.svg"));

        let batch = cache.take();
        assert!(batch.changed.is_empty());
        assert_eq!(batch.removed, vec![PathBuf::from("src/icons/arrow.svg")]);
    }

    #[test]
    fn change_after_removal_moves_the_path_back() {
        let mut cache = cache();
        cache.add_event(&FileEvent::new(FileEventKind::Removed, "src/styles/a.scss"));
        cache.add_event(&FileEvent::new(FileEventKind::Modified, "src/styles/a.scss"));

        let batch = cache.take();
        assert_eq!(batch.changed, vec![PathBuf::from("src/styles/a.scss")]);
        assert!(batch.removed.is_empty());
    }

    #[test]
    fn take_clears_unconditionally() {
        let mut cache = cache();
        cache.add_event(&FileEvent::new(FileEventKind::Added, "src/assets/logo.png"));
        let first = cache.take();
        assert!(!first.is_empty());

        let second = cache.take();
        assert!(second.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn custom_vocabulary_reclassifies_kinds() {
        // A dist-side watcher may treat additions as removals of stale
        // state; the partition is caller-supplied, not hardcoded.
        let classes = EventClasses {
            changed_kinds: vec![FileEventKind::Modified],
            removed_kinds: vec![FileEventKind::Added, FileEventKind::Removed],
        };
        let mut cache = EventCache::new(classes);
        cache.add_event(&FileEvent::new(FileEventKind::Added, "dist/assets/x.js"));

        let batch = cache.take();
        assert_eq!(batch.removed, vec![PathBuf::from("dist/assets/x.js")]);
    }
}

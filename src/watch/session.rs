// src/watch/session.rs

//! Wiring of watchers and debouncers for one `watch` invocation.
//!
//! One source-tree subscription per asset class, each feeding its own
//! debouncer, plus a single output-tree watcher that re-logs external
//! writes. All handles are owned by the session; dropping it tears the
//! whole pipeline down.

use crate::assets::Processors;
use crate::config::paths::{AssetClass, ProjectPaths};
use crate::errors::Result;
use crate::report::ErrorCollector;
use crate::watch::debounce::{spawn_debouncer, DebouncerHandle};
use crate::watch::watcher::{spawn_class_watcher, spawn_dist_watcher, WatcherHandle};
use crate::watch::{EventClasses, DEBOUNCE_WINDOW};

/// A running watch pipeline. Keep it alive for as long as rebuilds should
/// happen.
#[derive(Debug)]
pub struct WatchSession {
    _debouncers: Vec<DebouncerHandle>,
    _watchers: Vec<WatcherHandle>,
}

impl WatchSession {
    /// Subscribe to the source tree for every asset class and to the output
    /// tree. Each debounce flush ends with a drain-and-report cycle so
    /// errors surface per rebuild instead of accumulating silently.
    pub fn start(
        paths: &ProjectPaths,
        processors: &Processors,
        collector: &ErrorCollector,
    ) -> Result<Self> {
        let mut debouncers = Vec::new();
        let mut watchers = Vec::new();

        for class in AssetClass::ALL {
            let processor = processors.for_class(class);
            let on_cycle = {
                let collector = collector.clone();
                move || {
                    collector.drain_and_report();
                }
            };
            let debouncer = spawn_debouncer(
                processor,
                EventClasses::default(),
                DEBOUNCE_WINDOW,
                collector.clone(),
                on_cycle,
            );
            watchers.push(spawn_class_watcher(paths, class, &debouncer)?);
            debouncers.push(debouncer);
        }

        watchers.push(spawn_dist_watcher(paths, collector.clone())?);

        Ok(Self {
            _debouncers: debouncers,
            _watchers: watchers,
        })
    }
}

// src/watch/debounce.rs

//! Quiet-period flushing of an [`EventCache`] into an asset processor.
//!
//! The debouncer is an explicit timer + cache loop: every incoming event
//! restarts the window; once no event has arrived for a full window, the
//! accumulated batch is flushed. The bound processor is invoked at most
//! twice per flush (changed set, then removed set) and the cache is cleared
//! unconditionally, even when a processor call fails - failures are
//! reported, not retried.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::assets::AssetProcessor;
use crate::report::ErrorCollector;
use crate::watch::cache::EventCache;
use crate::watch::{EventClasses, FileEvent};

/// Handle for a spawned debouncer loop.
///
/// Dropping the handle closes the event channel; the loop flushes whatever
/// is pending and exits.
#[derive(Debug)]
pub struct DebouncerHandle {
    tx: mpsc::UnboundedSender<FileEvent>,
    _join: JoinHandle<()>,
}

impl DebouncerHandle {
    /// Feed one event into the cache, restarting the quiet-period timer.
    pub fn send(&self, event: FileEvent) {
        if self.tx.send(event).is_err() {
            warn!("debouncer loop is gone; dropping event");
        }
    }

    pub(crate) fn sender(&self) -> mpsc::UnboundedSender<FileEvent> {
        self.tx.clone()
    }
}

/// Spawn the debounce loop for one watcher subscription.
///
/// `on_cycle` runs after every flush that invoked the processor; watch
/// sessions use it to drain and report the collector per rebuild cycle.
pub fn spawn_debouncer(
    processor: Arc<dyn AssetProcessor>,
    classes: EventClasses,
    window: Duration,
    collector: ErrorCollector,
    on_cycle: impl Fn() + Send + Sync + 'static,
) -> DebouncerHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<FileEvent>();

    let join = tokio::spawn(async move {
        let mut cache = EventCache::new(classes);

        loop {
            if cache.is_empty() {
                // Nothing pending: block until the next event or shutdown.
                match rx.recv().await {
                    Some(event) => cache.add_event(&event),
                    None => break,
                }
            } else {
                tokio::select! {
                    maybe = rx.recv() => match maybe {
                        Some(event) => cache.add_event(&event),
                        None => {
                            flush(&mut cache, &processor, &collector).await;
                            on_cycle();
                            break;
                        }
                    },
                    _ = tokio::time::sleep(window) => {
                        flush(&mut cache, &processor, &collector).await;
                        on_cycle();
                    }
                }
            }
        }
        debug!(class = processor.class().name(), "debouncer loop finished");
    });

    DebouncerHandle { tx, _join: join }
}

async fn flush(
    cache: &mut EventCache,
    processor: &Arc<dyn AssetProcessor>,
    collector: &ErrorCollector,
) {
    let batch = cache.take();
    if batch.is_empty() {
        return;
    }

    let class = processor.class().name();
    debug!(
        class,
        changed = batch.changed.len(),
        removed = batch.removed.len(),
        "flushing event cache"
    );

    if !batch.changed.is_empty() {
        if let Err(err) = processor.process(batch.changed).await {
            collector.record(format!("watch:{class}"), err);
        }
    }

    if !batch.removed.is_empty() {
        if let Err(err) = processor.remove(batch.removed).await {
            collector.record(format!("remove:{class}"), err);
        }
    }
}

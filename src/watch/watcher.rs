// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::paths::{AssetClass, ProjectPaths};
use crate::report::{self, ErrorCollector};
use crate::watch::debounce::DebouncerHandle;
use crate::watch::{FileEvent, FileEventKind};

/// Handle for a filesystem watcher subscription.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a watcher over the source tree for one asset class, routing
/// matching events into the class's debouncer.
///
/// `notify` only reports changes that happen after the watch starts, so
/// there is no initial "existing file" enumeration to suppress. Dotfiles are
/// ignored by convention.
pub fn spawn_class_watcher(
    paths: &ProjectPaths,
    class: AssetClass,
    debouncer: &DebouncerHandle,
) -> Result<WatcherHandle> {
    let root = canonical_root(paths.root());
    let glob_set = class.glob_set()?;
    let event_tx = debouncer.sender();

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Event>();
    let mut watcher = new_bridge_watcher(notify_tx)?;

    let src_root = paths.src_root();
    std::fs::create_dir_all(&src_root)?;
    watcher.watch(&src_root, RecursiveMode::Recursive)?;

    info!(class = class.name(), root = ?src_root, "source watcher started");

    tokio::spawn(async move {
        while let Some(event) = notify_rx.recv().await {
            let Some(kind) = classify_kind(&event.kind) else {
                continue;
            };
            for path in event.paths {
                let Some(rel) = relative_path(&root, &path) else {
                    continue;
                };
                if is_dotpath(&rel) || !glob_set.is_match(&rel) {
                    continue;
                }
                report::log_file_event(kind.label(), &rel, false);
                if event_tx.send(FileEvent::new(kind, rel)).is_err() {
                    debug!("debouncer channel closed; stopping watch forwarder");
                    return;
                }
            }
        }
        debug!("source watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Spawn a watcher over the output tree that re-logs externally-driven
/// changes (e.g. out-of-band writes by the sync gateway) without
/// reprocessing anything. Quiet while the collector holds errors, so the
/// error report is not buried under event noise.
pub fn spawn_dist_watcher(
    paths: &ProjectPaths,
    collector: ErrorCollector,
) -> Result<WatcherHandle> {
    let root = canonical_root(paths.root());

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Event>();
    let mut watcher = new_bridge_watcher(notify_tx)?;

    let dist_root = paths.dist_root();
    std::fs::create_dir_all(&dist_root)?;
    watcher.watch(&dist_root, RecursiveMode::Recursive)?;

    info!(root = ?dist_root, "output-tree watcher started");

    tokio::spawn(async move {
        while let Some(event) = notify_rx.recv().await {
            let Some(kind) = classify_kind(&event.kind) else {
                continue;
            };
            if collector.has_errors() {
                continue;
            }
            for path in event.paths {
                let Some(rel) = relative_path(&root, &path) else {
                    continue;
                };
                if is_dotpath(&rel) {
                    continue;
                }
                report::log_file_event(kind.label(), &rel, true);
            }
        }
        debug!("output-tree watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Closure called synchronously by notify whenever an event arrives; all it
/// does is forward into the async world.
fn new_bridge_watcher(tx: mpsc::UnboundedSender<Event>) -> Result<RecommendedWatcher> {
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = tx.send(event) {
                    // We can't log via tracing here easily, so fall back to stderr.
                    eprintln!("leafbuild: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("leafbuild: file watch error: {err}");
            }
        },
        Config::default(),
    )?;
    Ok(watcher)
}

fn canonical_root(root: &Path) -> PathBuf {
    // Canonicalize once so we have a stable base for relativizing event
    // paths, which notify reports absolute.
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

fn classify_kind(kind: &EventKind) -> Option<FileEventKind> {
    match kind {
        EventKind::Create(_) => Some(FileEventKind::Added),
        EventKind::Modify(_) => Some(FileEventKind::Modified),
        EventKind::Remove(_) => Some(FileEventKind::Removed),
        _ => None,
    }
}

/// Relativize an event path against the project root.
///
/// Falls back to canonicalizing both sides, which helps on platforms where
/// different absolute prefixes refer to the same directory (symlinks,
/// `/private/var/...` on macOS).
fn relative_path(root: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_path_buf());
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_path_buf());
        }
    }

    None
}

fn is_dotpath(rel: &Path) -> bool {
    rel.components().any(|c| {
        c.as_os_str()
            .to_string_lossy()
            .starts_with('.')
    })
}

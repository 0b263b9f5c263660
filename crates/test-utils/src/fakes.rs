#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use leafbuild::assets::{AssetProcessor, BoxFuture};
use leafbuild::config::paths::AssetClass;
use leafbuild::errors::{LeafError, Result};
use leafbuild::sync::{DeleteMode, Destination, SyncGateway};

/// One recorded gateway invocation, flattened to plain data for easy
/// assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCall {
    Push {
        store: String,
        environment: String,
        delete_mode_is_delete: bool,
    },
    Pull {
        store: String,
        environment: String,
        target_dir: PathBuf,
    },
    Serve {
        store: String,
        password: Option<String>,
    },
    Package,
}

/// A fake sync gateway that:
/// - records every operation invoked on it
/// - succeeds by default, or fails operations registered via `fail_on`.
#[derive(Clone, Default)]
pub struct FakeGateway {
    calls: Arc<Mutex<Vec<SyncCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    pull_writes: Arc<Mutex<Vec<(PathBuf, String)>>>,
    package_writes: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation ("push", "pull", "serve", "package") fail.
    pub fn fail_on(self, operation: &str) -> Self {
        self.failing.lock().unwrap().insert(operation.to_string());
        self
    }

    /// Make `pull` write the given file (relative to the pull target dir),
    /// simulating a remote theme download.
    pub fn on_pull_write(self, rel_path: &str, contents: &str) -> Self {
        self.pull_writes
            .lock()
            .unwrap()
            .push((PathBuf::from(rel_path), contents.to_string()));
        self
    }

    /// Make `package` write the given file (absolute path), simulating the
    /// archive the real tool drops into the output tree.
    pub fn on_package_write(self, abs_path: impl Into<PathBuf>, contents: &str) -> Self {
        self.package_writes
            .lock()
            .unwrap()
            .push((abs_path.into(), contents.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<SyncCall> {
        self.calls.lock().unwrap().clone()
    }

    fn complete(&self, operation: &str, call: SyncCall) -> Result<()> {
        let should_fail = self.failing.lock().unwrap().contains(operation);
        self.calls.lock().unwrap().push(call);
        if should_fail {
            Err(LeafError::SyncFailed {
                operation: operation.to_string(),
                destination: "fake".to_string(),
                message: "injected failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl SyncGateway for FakeGateway {
    fn push(&self, destination: Destination, delete_mode: DeleteMode) -> BoxFuture<'static, Result<()>> {
        let this = self.clone();
        Box::pin(async move {
            this.complete(
                "push",
                SyncCall::Push {
                    store: destination.store,
                    environment: destination.environment,
                    delete_mode_is_delete: delete_mode == DeleteMode::Delete,
                },
            )
        })
    }

    fn pull(
        &self,
        destination: Destination,
        target_dir: PathBuf,
        _delete_mode: DeleteMode,
    ) -> BoxFuture<'static, Result<()>> {
        let this = self.clone();
        Box::pin(async move {
            let writes = this.pull_writes.lock().unwrap().clone();
            for (rel, contents) in writes {
                let path = target_dir.join(rel);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).expect("creating fake pull dirs");
                }
                std::fs::write(&path, contents).expect("writing fake pull file");
            }
            this.complete(
                "pull",
                SyncCall::Pull {
                    store: destination.store,
                    environment: destination.environment,
                    target_dir,
                },
            )
        })
    }

    fn serve(&self, destination: Destination) -> BoxFuture<'static, Result<()>> {
        let this = self.clone();
        Box::pin(async move {
            this.complete(
                "serve",
                SyncCall::Serve {
                    store: destination.store,
                    password: destination.password,
                },
            )
        })
    }

    fn package(&self) -> BoxFuture<'static, Result<()>> {
        let this = self.clone();
        Box::pin(async move {
            let writes = this.package_writes.lock().unwrap().clone();
            for (path, contents) in writes {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).expect("creating fake package dirs");
                }
                std::fs::write(&path, contents).expect("writing fake package file");
            }
            this.complete("package", SyncCall::Package)
        })
    }
}

/// An asset processor that records the batches handed to it and reports
/// success, for exercising the debounce/flush machinery without touching
/// the filesystem.
#[derive(Clone)]
pub struct RecordingProcessor {
    class: AssetClass,
    pub processed: Arc<Mutex<Vec<Vec<PathBuf>>>>,
    pub removed: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

impl RecordingProcessor {
    pub fn new(class: AssetClass) -> Self {
        Self {
            class,
            processed: Arc::new(Mutex::new(Vec::new())),
            removed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn processed_batches(&self) -> Vec<Vec<PathBuf>> {
        self.processed.lock().unwrap().clone()
    }

    pub fn removed_batches(&self) -> Vec<Vec<PathBuf>> {
        self.removed.lock().unwrap().clone()
    }
}

impl AssetProcessor for RecordingProcessor {
    fn class(&self) -> AssetClass {
        self.class
    }

    fn process(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        let processed = Arc::clone(&self.processed);
        Box::pin(async move {
            processed.lock().unwrap().push(paths);
            Ok(())
        })
    }

    fn remove(&self, paths: Vec<PathBuf>) -> BoxFuture<'_, Result<()>> {
        let removed = Arc::clone(&self.removed);
        Box::pin(async move {
            removed.lock().unwrap().push(paths);
            Ok(())
        })
    }
}

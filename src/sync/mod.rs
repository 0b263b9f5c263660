// src/sync/mod.rs

//! Remote-store synchronization gateway.
//!
//! The core never inspects these operations; it only sequences them around
//! the build graph and observes success/failure plus streamed output. The
//! production implementation shells out to the `shopify` CLI
//! ([`shopify::ShopifyCli`]); tests substitute their own [`SyncGateway`].

use std::path::PathBuf;

use crate::assets::BoxFuture;
use crate::errors::Result;

pub mod shopify;

pub use shopify::ShopifyCli;

/// Whether a remote sync may delete files absent from the local set.
///
/// The default everywhere is [`DeleteMode::Preserve`]; `--delete` on the
/// CLI switches to [`DeleteMode::Delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    Preserve,
    Delete,
}

/// A resolved remote target: store domain plus the theme for one
/// environment.
#[derive(Debug, Clone)]
pub struct Destination {
    pub store: String,
    pub environment: String,
    pub theme_id: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.store, self.environment)
    }
}

/// Opaque remote operations the orchestration core depends on.
///
/// All four are black boxes with a success/failure outcome; `serve` is
/// long-running and only terminates with the process.
pub trait SyncGateway: Send + Sync {
    /// Push the output tree to the destination theme.
    fn push(&self, destination: Destination, delete_mode: DeleteMode) -> BoxFuture<'static, Result<()>>;

    /// Pull the destination theme into `target_dir`.
    fn pull(
        &self,
        destination: Destination,
        target_dir: PathBuf,
        delete_mode: DeleteMode,
    ) -> BoxFuture<'static, Result<()>>;

    /// Serve the output tree against the destination's development theme.
    /// Resolves only when the underlying process exits.
    fn serve(&self, destination: Destination) -> BoxFuture<'static, Result<()>>;

    /// Package the output tree into a single archive artifact.
    fn package(&self) -> BoxFuture<'static, Result<()>>;
}

// src/sync/shopify.rs

//! `shopify theme` CLI wrapper.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::assets::BoxFuture;
use crate::config::paths::DIST_ROOT;
use crate::errors::{LeafError, Result};
use crate::report;
use crate::sync::{DeleteMode, Destination, SyncGateway};

/// Production gateway shelling out to the `shopify` CLI.
#[derive(Debug, Clone)]
pub struct ShopifyCli {
    /// Project root the CLI runs in.
    root: PathBuf,
}

impl ShopifyCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SyncGateway for ShopifyCli {
    fn push(&self, destination: Destination, delete_mode: DeleteMode) -> BoxFuture<'static, Result<()>> {
        let root = self.root.clone();
        Box::pin(async move {
            let mut args = vec![
                "theme".to_string(),
                "push".to_string(),
                "--store".to_string(),
                destination.store.clone(),
                "--path".to_string(),
                DIST_ROOT.to_string(),
            ];
            if let Some(theme) = &destination.theme_id {
                args.push("--theme".to_string());
                args.push(theme.clone());
            }
            if delete_mode == DeleteMode::Preserve {
                args.push("--nodelete".to_string());
            }
            run_cli("push", &destination, &root, args).await
        })
    }

    fn pull(
        &self,
        destination: Destination,
        target_dir: PathBuf,
        delete_mode: DeleteMode,
    ) -> BoxFuture<'static, Result<()>> {
        let root = self.root.clone();
        Box::pin(async move {
            let mut args = vec![
                "theme".to_string(),
                "pull".to_string(),
                "--store".to_string(),
                destination.store.clone(),
                "--path".to_string(),
                target_dir.to_string_lossy().into_owned(),
            ];
            if let Some(theme) = &destination.theme_id {
                args.push("--theme".to_string());
                args.push(theme.clone());
            }
            if delete_mode == DeleteMode::Preserve {
                args.push("--nodelete".to_string());
            }
            run_cli("pull", &destination, &root, args).await
        })
    }

    fn serve(&self, destination: Destination) -> BoxFuture<'static, Result<()>> {
        let root = self.root.clone();
        Box::pin(async move {
            let mut args = vec![
                "theme".to_string(),
                "dev".to_string(),
                "--store".to_string(),
                destination.store.clone(),
                "--path".to_string(),
                DIST_ROOT.to_string(),
            ];
            if let Some(password) = &destination.password {
                args.push("--store-password".to_string());
                args.push(password.clone());
            }
            run_cli("serve", &destination, &root, args).await
        })
    }

    fn package(&self) -> BoxFuture<'static, Result<()>> {
        let root = self.root.clone();
        Box::pin(async move {
            let destination = Destination {
                store: "local".to_string(),
                environment: "package".to_string(),
                theme_id: None,
                password: None,
            };
            let args = vec![
                "theme".to_string(),
                "package".to_string(),
                "--path".to_string(),
                DIST_ROOT.to_string(),
            ];
            run_cli("package", &destination, &root, args).await
        })
    }
}

/// Spawn the CLI, stream its stdout to the user, and turn a non-zero exit
/// into a [`LeafError::SyncFailed`] carrying the destination context.
async fn run_cli(
    operation: &str,
    destination: &Destination,
    root: &PathBuf,
    args: Vec<String>,
) -> Result<()> {
    report::log_child_process(&format!("shopify {}", args.join(" ")));

    let mut child = Command::new("shopify")
        .args(&args)
        .current_dir(root)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning `shopify` for {operation}; is the CLI installed?"))?;

    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        let mut lines = reader.lines();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{line}");
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `shopify` {operation}"))?;

    let code = status.code().unwrap_or(-1);
    debug!(operation, exit_code = code, "shopify CLI exited");

    if status.success() {
        info!(operation, destination = %destination, "sync operation complete");
        Ok(())
    } else {
        Err(LeafError::SyncFailed {
            operation: operation.to_string(),
            destination: destination.to_string(),
            message: format!("shopify CLI exited with code {code}"),
        })
    }
}

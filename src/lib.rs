// src/lib.rs

//! leafbuild - incremental asset-build orchestrator for themed-site
//! projects.
//!
//! The crate is organized around a few seams:
//! - [`graph`]: task graph values (sequence/parallel composition) and the
//!   scheduler that runs them with recoverable-vs-fatal stage semantics.
//! - [`assets`]: per-class asset processors (scripts, styles, statics,
//!   icons) behind a common trait.
//! - [`watch`]: filesystem watching, event classification and debounced
//!   batch flushing.
//! - [`sync`]: the remote-store gateway trait and its `shopify` CLI
//!   implementation.
//! - [`commands`]: one module per CLI subcommand, each assembling its own
//!   graph.

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod report;
pub mod sync;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use crate::cli::{CliArgs, Command};
use crate::commands::Project;
use crate::errors::Result;
use crate::graph::RunOutcome;
use crate::sync::ShopifyCli;

/// Dispatch one parsed invocation to its command module.
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let project = Project::load(Path::new(&args.config))?;
    let gateway = Arc::new(ShopifyCli::new(project.paths.root().to_path_buf()));

    match args.command {
        Command::Build { dev } => commands::build::run(&project, dev).await,
        Command::Watch {
            store,
            store_password,
            optimize,
        } => {
            commands::watch::run(
                &project,
                gateway,
                commands::watch::WatchOptions {
                    store,
                    store_password,
                    optimize,
                },
            )
            .await
        }
        Command::Deploy {
            env,
            store,
            dev,
            delete,
        } => {
            commands::deploy::run(
                &project,
                gateway,
                commands::deploy::DeployOptions {
                    environment: env,
                    store,
                    dev,
                    delete,
                },
            )
            .await
        }
        Command::Pull {
            env,
            store,
            all,
            delete,
        } => {
            commands::pull::run(
                &project,
                gateway,
                commands::pull::PullOptions {
                    environment: env,
                    store,
                    all,
                    delete,
                },
            )
            .await
        }
        Command::Zip => commands::zip::run(&project, gateway).await,
    }
}

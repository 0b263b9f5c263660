// src/logging.rs

//! Diagnostic logging setup.
//!
//! Diagnostics run through `tracing` with an `EnvFilter`, so targets can be
//! tuned per module (e.g. `LEAFBUILD_LOG=leafbuild::watch=trace,info`).
//! Directive precedence: `--log-level` flag, then the `LEAFBUILD_LOG`
//! environment variable, then `info`. Everything is written to stderr,
//! keeping stdout for build output and file-event lines.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level)?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        // An explicit flag silences the environment variable entirely.
        return EnvFilter::try_new(level.directive()).map_err(Into::into);
    }
    Ok(EnvFilter::try_from_env("LEAFBUILD_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `leafbuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "leafbuild",
    version,
    about = "Build, watch and deploy themed-site assets.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project config file (TOML).
    ///
    /// Default: `leaf.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "leaf.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LEAFBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build ./src files into the dist folder.
    Build {
        /// Skip asset optimization steps such as compression and
        /// minification.
        #[arg(short, long)]
        dev: bool,
    },

    /// Watch files for changes and continuously rebuild and serve.
    Watch {
        /// For multi-store projects, the store to run the watch against.
        #[arg(short, long, value_name = "STORE")]
        store: Option<String>,

        /// Password for password-protected preview stores.
        #[arg(short = 'p', long, value_name = "PASSWORD")]
        store_password: Option<String>,

        /// Optimize assets (off by default while watching).
        #[arg(short, long)]
        optimize: bool,
    },

    /// Full (re)build, then push dist files to the configured theme.
    Deploy {
        /// Environment (theme) to deploy to.
        #[arg(short, long, value_name = "ENV", default_value = "development")]
        env: String,

        /// For multi-store projects, the store to deploy to.
        #[arg(short, long, value_name = "STORE")]
        store: Option<String>,

        /// Skip asset optimization steps.
        #[arg(short, long)]
        dev: bool,

        /// Allow the remote sync to delete files absent from dist
        /// (default preserves them).
        #[arg(long)]
        delete: bool,
    },

    /// Pull the specified theme into the src folder (settings only by
    /// default).
    Pull {
        /// Environment (theme) to pull from.
        #[arg(short, long, value_name = "ENV", default_value = "development")]
        env: String,

        /// For multi-store projects, the store to pull from.
        #[arg(short, long, value_name = "STORE")]
        store: Option<String>,

        /// Pull all theme files, not just settings.
        #[arg(short, long)]
        all: bool,

        /// Delete local files that diverge from the pulled set.
        #[arg(short, long)]
        delete: bool,
    },

    /// Rebuild and package the output tree into a single archive.
    Zip,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The level as a filter directive string.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

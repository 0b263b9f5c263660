// src/main.rs

use std::process::ExitCode;

use leafbuild::errors::Result;
use leafbuild::graph::RunOutcome;
use leafbuild::{cli, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("leafbuild: failed to initialise logging: {err}");
    }

    let result: Result<RunOutcome> = leafbuild::run(args).await;
    match result {
        Ok(outcome) if outcome.had_errors() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("leafbuild error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

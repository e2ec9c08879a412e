//! `langfuse-prompts`: list the prompts of a Langfuse project
//!
//! Exit status is 0 when a candidate answered (even with zero prompts) and 1
//! on configuration errors or when every candidate failed.

use clap::Parser;
use langfuse_prompt_fetch::cli::{self, Args};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("langfuse_prompt_fetch={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            // --help and --version print to stdout and succeed; usage errors are bad config
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(args.verbose);

    let stdout = io::stdout();
    ExitCode::from(cli::run(&args, stdout.lock()).await)
}

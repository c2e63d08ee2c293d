//! vitrine CLI (Rust)
//!
//! Command-line utility over an aggregated dealer inventory:
//! - `search` - filtered, ranked search with progressive filter relaxation
//! - `list` - category-grouped inventory listing
//! - `ingest` - normalize a raw feed payload into the vehicle schema
//! - `stats` - inventory distribution report

mod catalog;
mod cli;
mod error;
mod inventory;
mod search;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;
use std::future::Future;
use tokio::time::{timeout, Duration};

/// Worst-case cost is inventory size times the bounded relaxation sequence;
/// the timeout is the caller-side guard the engine itself does not carry.
const TOOL_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    // Execute command
    let result = match cli.command {
        Some(Commands::Search(args)) => run_tool(tools::search::execute_search(args)).await,
        Some(Commands::List(args)) => run_tool(tools::list::execute_list(args)).await,
        Some(Commands::Ingest(args)) => run_tool(tools::ingest::execute_ingest(args)).await,
        Some(Commands::Stats(args)) => run_tool(tools::stats::execute_stats(args)).await,
        None => {
            eprintln!("Error: No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    // Handle result and exit with appropriate code
    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e.message());
            std::process::exit(e.exit_code());
        }
    }
}

/// Run a tool under the shared timeout.
async fn run_tool<F>(tool: F) -> Result<String, AppError>
where
    F: Future<Output = Result<String, AppError>>,
{
    match timeout(Duration::from_secs(TOOL_TIMEOUT_SECS), tool).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "request exceeded {TOOL_TIMEOUT_SECS} second timeout"
        ))),
    }
}

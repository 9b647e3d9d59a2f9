//! # archive CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use archive_cli::index::{run_index, IndexArgs};
use archive_cli::list::{run_list, ListArgs};
use archive_cli::open::{run_open, OpenArgs};
use archive_cli::summary::{run_summary, SummaryArgs};

/// Periodical archive browser.
///
/// Browses the archived issues of the storefront by year and month and
/// checks access to individual documents.
#[derive(Parser, Debug)]
#[command(name = "archive", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Per-year and per-month document counts.
    Summary(SummaryArgs),

    /// Documents of one month, newest first.
    List(ListArgs),

    /// Check access to a document and report the outcome.
    Open(OpenArgs),

    /// Build the index from a local catalog file.
    Index(IndexArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "archive CLI starting");

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Summary(args) => run_summary(&args, &mut stdout).await,
        Commands::List(args) => run_list(&args, &mut stdout).await,
        Commands::Open(args) => run_open(&args, &mut stdout).await,
        Commands::Index(args) => run_index(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

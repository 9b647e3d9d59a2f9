//! # Summary Subcommand
//!
//! Fetches the catalog and prints per-year, per-month document counts, the
//! navigation the archive page offers before anything is selected.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use archive_client::ArchiveClient;
use archive_state::{ArchivePage, TracingViewer};
use clap::Args;

use crate::{write_summary, ApiArgs, OutputFormat};

/// Arguments for the `archive summary` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Execute the summary subcommand. Returns exit code 0 on success.
pub async fn run_summary(args: &SummaryArgs, out: &mut dyn Write) -> Result<u8> {
    let config = args.api.resolve()?;
    let client = ArchiveClient::new(&config)?;
    let state = ArchivePage::mount(
        client.catalog(),
        &config.category,
        TracingViewer,
        Arc::new(client.access().clone()),
    )
    .await?;

    write_summary(out, &state.summary(), args.format)?;
    if state.index().skipped() > 0 && args.format == OutputFormat::Text {
        writeln!(
            out,
            "({} undated documents not shown)",
            state.index().skipped()
        )?;
    }
    Ok(0)
}

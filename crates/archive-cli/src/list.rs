//! # List Subcommand
//!
//! Prints the documents of one month, newest first.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use archive_client::ArchiveClient;
use archive_state::{ArchivePage, TracingViewer};
use clap::Args;

use crate::{write_documents, ApiArgs, OutputFormat};

/// Arguments for the `archive list` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Year to list.
    #[arg(long)]
    pub year: i32,

    /// Month to list (1-12).
    #[arg(long)]
    pub month: u8,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Execute the list subcommand. Returns exit code 0 on success; an invalid
/// month is an operational error.
pub async fn run_list(args: &ListArgs, out: &mut dyn Write) -> Result<u8> {
    let config = args.api.resolve()?;
    let client = ArchiveClient::new(&config)?;
    let mut state = ArchivePage::mount(
        client.catalog(),
        &config.category,
        TracingViewer,
        Arc::new(client.access().clone()),
    )
    .await?;

    state.select_year(args.year);
    state.select_month(args.month)?;
    write_documents(out, state.visible_items(), args.format)?;
    Ok(0)
}

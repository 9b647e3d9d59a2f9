//! # Index Subcommand
//!
//! Builds the year → month index from a catalog JSON file on disk. No
//! network access; useful for checking how an export will be bucketed.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use archive_core::document::parse_catalog;
use archive_core::{build_index, summarize};
use clap::Args;

use crate::{write_documents, write_summary, OutputFormat};

/// Arguments for the `archive index` subcommand.
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Catalog listing as returned by the archive API.
    #[arg(long, value_name = "CATALOG_JSON")]
    pub file: PathBuf,

    /// Only print documents of this year (requires --month).
    #[arg(long, requires = "month")]
    pub year: Option<i32>,

    /// Only print documents of this month.
    #[arg(long, requires = "year")]
    pub month: Option<u8>,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Execute the index subcommand. Returns exit code 0 on success.
pub fn run_index(args: &IndexArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read catalog file: {}", args.file.display()))?;
    let documents = parse_catalog(&raw)
        .with_context(|| format!("failed to parse catalog file: {}", args.file.display()))?;
    let index = build_index(&documents);
    tracing::debug!(
        documents = documents.len(),
        indexed = index.len(),
        skipped = index.skipped(),
        "catalog indexed"
    );

    match (args.year, args.month) {
        (Some(year), Some(month)) => write_documents(out, index.documents(year, month), args.format)?,
        _ => write_summary(out, &summarize(&index), args.format)?,
    }
    if index.skipped() > 0 && args.format == OutputFormat::Text {
        writeln!(out, "({} undated documents not shown)", index.skipped())?;
    }
    Ok(0)
}

//! # archive-cli — Periodical Archive Command-Line Interface
//!
//! A terminal host for the archive browsing core. Each subcommand mounts
//! the same state machine a graphical storefront would, against the live
//! archive API or a local catalog file.
//!
//! ## Subcommands
//!
//! - `summary`: per-year, per-month document counts
//! - `list`: documents of one month, newest first
//! - `open`: run the access check for one document and report the outcome
//! - `index`: build the index from a local JSON catalog, offline
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers return an exit code.
//! - Handlers delegate to `archive-state` and `archive-core`. No browsing
//!   logic here.

pub mod index;
pub mod list;
pub mod open;
pub mod summary;

use std::io::Write;

use anyhow::{Context, Result};
use archive_client::ArchiveApiConfig;
use archive_core::{ArchiveDocument, CategoryTag, YearSummary};
use clap::{Args, ValueEnum};

/// Connection flags shared by the networked subcommands. Each overrides the
/// matching `ARCHIVE_*` environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Archive API base URL.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Catalog category to browse.
    #[arg(long)]
    pub category: Option<String>,
}

impl ApiArgs {
    /// Environment configuration with flag overrides applied.
    pub fn resolve(&self) -> Result<ArchiveApiConfig> {
        let mut config =
            ArchiveApiConfig::from_env().context("invalid archive API configuration")?;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url)?;
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            config.category = CategoryTag(category.trim().to_string());
        }
        Ok(config)
    }
}

/// Output format of listings.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub(crate) fn write_summary(
    out: &mut dyn Write,
    summary: &[YearSummary],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?,
        OutputFormat::Text => {
            if summary.is_empty() {
                writeln!(out, "No dated documents in the archive.")?;
            }
            for year in summary {
                writeln!(out, "{}  ({} documents)", year.year, year.total())?;
                for month in &year.month_counts {
                    writeln!(out, "  {}-{:02}  {}", year.year, month.month, month.count)?;
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn write_documents(
    out: &mut dyn Write,
    documents: &[ArchiveDocument],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(documents)?)?,
        OutputFormat::Text => {
            if documents.is_empty() {
                writeln!(out, "No documents.")?;
            }
            for doc in documents {
                let date = doc
                    .placement()
                    .map(|(date, _)| date.to_string())
                    .unwrap_or_default();
                match &doc.subtitle {
                    Some(subtitle) => {
                        writeln!(out, "{date}  {}  {} ({subtitle})", doc.id.as_str(), doc.title)?
                    }
                    None => writeln!(out, "{date}  {}  {}", doc.id.as_str(), doc.title)?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_core::MonthCount;

    #[test]
    fn summary_text_lists_years_and_months() {
        let summary = vec![YearSummary {
            year: 2023,
            month_counts: vec![
                MonthCount { month: 5, count: 2 },
                MonthCount { month: 1, count: 1 },
            ],
        }];
        let mut out = Vec::new();
        write_summary(&mut out, &summary, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "2023  (3 documents)\n  2023-05  2\n  2023-01  1\n");
    }

    #[test]
    fn summary_json_is_parseable() {
        let summary = vec![YearSummary {
            year: 2022,
            month_counts: vec![MonthCount { month: 12, count: 4 }],
        }];
        let mut out = Vec::new();
        write_summary(&mut out, &summary, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["year"], 2022);
        assert_eq!(value[0]["month_counts"][0]["count"], 4);
    }

    #[test]
    fn api_args_override_category() {
        let args = ApiArgs {
            api_url: Some("http://archive.test:9000".into()),
            category: Some(" newsletter ".into()),
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.category.as_str(), "newsletter");
        assert_eq!(config.base_url.as_str(), "http://archive.test:9000/");
    }

    #[test]
    fn api_args_reject_bad_url() {
        let args = ApiArgs {
            api_url: Some("not a url".into()),
            category: None,
        };
        assert!(args.resolve().is_err());
    }
}

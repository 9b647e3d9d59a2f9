//! # Open Subcommand
//!
//! Runs the full access flow for one document: mount the archive, select
//! the document's month, activate it, and report the overlay the page
//! would show.
//!
//! ## Exit codes
//!
//! | Code | Outcome |
//! |------|---------|
//! | 0 | access granted; the content locator is printed |
//! | 1 | operational error (bad configuration, catalog unavailable, unknown document) |
//! | 2 | login required |
//! | 3 | subscription required |
//! | 4 | transient access-check failure |
//! | 130 | interrupted while the check was pending |

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use archive_client::ArchiveClient;
use archive_core::{BearerToken, DocumentId};
use archive_state::{ArchivePage, Overlay, TracingViewer};
use clap::Args;

pub const EXIT_GRANTED: u8 = 0;
pub const EXIT_LOGIN_REQUIRED: u8 = 2;
pub const EXIT_SUBSCRIPTION_REQUIRED: u8 = 3;
pub const EXIT_TRANSIENT: u8 = 4;
pub const EXIT_INTERRUPTED: u8 = 130;

/// Arguments for the `archive open` subcommand.
#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// Identifier of the document to open.
    #[arg(value_name = "DOCUMENT_ID")]
    pub document_id: String,

    /// Bearer credential of the visitor. Omit to check as an anonymous
    /// visitor against the free-view quota.
    #[arg(long, env = "ARCHIVE_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(flatten)]
    pub api: crate::ApiArgs,
}

/// Execute the open subcommand. See the module docs for exit codes.
pub async fn run_open(args: &OpenArgs, out: &mut dyn Write) -> Result<u8> {
    let config = args.api.resolve()?;
    let credential = match &args.token {
        Some(raw) => BearerToken::new(raw.clone()),
        None => config.auth_token.clone(),
    };
    let document_id = DocumentId::new(args.document_id.as_str())?;

    let client = ArchiveClient::new(&config)?;
    let mut state = ArchivePage::mount(
        client.catalog(),
        &config.category,
        TracingViewer,
        Arc::new(client.access().clone()),
    )
    .await?;

    let Some((year, month, document)) = state
        .index()
        .locate(&document_id)
        .map(|(year, month, doc)| (year, month, doc.clone()))
    else {
        bail!("{document_id} is not in the '{}' archive", config.category);
    };
    state.select_year(year);
    state.select_month(month)?;

    let request = state.activate_item(&document, credential);
    let pending = tokio::spawn(request.resolve());
    tokio::select! {
        joined = pending => {
            state.apply(joined?);
        }
        _ = tokio::signal::ctrl_c() => {
            state.dismiss_overlay();
            writeln!(out, "CANCELLED: access check for {document_id} abandoned")?;
            return Ok(EXIT_INTERRUPTED);
        }
    }

    let code = match state.overlay() {
        Some(Overlay::ViewerOpen { .. }) => {
            match state.viewer_session() {
                Some(session) => writeln!(out, "GRANTED: {}", session.locator)?,
                None => bail!("viewer session missing after grant for {document_id}"),
            }
            EXIT_GRANTED
        }
        Some(Overlay::AuthPrompt { .. }) => {
            writeln!(out, "LOGIN REQUIRED: sign in to read {}", document.title)?;
            EXIT_LOGIN_REQUIRED
        }
        Some(Overlay::SubscriptionPrompt { .. }) => {
            writeln!(
                out,
                "SUBSCRIPTION REQUIRED: free views used up; subscribe to read {}",
                document.title
            )?;
            EXIT_SUBSCRIPTION_REQUIRED
        }
        Some(Overlay::ErrorPrompt { message, .. }) => {
            writeln!(out, "ERROR: {message}")?;
            EXIT_TRANSIENT
        }
        Some(Overlay::AccessPending { .. }) | None => {
            bail!("access check for {document_id} produced no outcome")
        }
    };

    state.leave();
    Ok(code)
}

//! # archive-client — Typed Rust client for the archive API
//!
//! Provides typed access to the two storefront endpoints the archive core
//! consumes:
//! - **Catalog listing** (`GET /api/v1/archive?category=…`), see [`catalog`]
//! - **Access check** (`GET /api/v1/archive/{id}/access`), see [`access`]
//!
//! ## Architecture
//!
//! This crate is the only place in the workspace that speaks HTTP. The
//! browsing state machine reaches it exclusively through the
//! [`archive_core::CatalogSource`] and [`archive_core::AccessGateway`]
//! traits, which [`catalog::CatalogClient`] and [`access::AccessClient`]
//! implement.
//!
//! ## Credentials
//!
//! The access check is per-visitor: the bearer credential is attached per
//! request, never as a client-wide default header, and is omitted entirely
//! for anonymous visitors.

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub(crate) mod retry;

pub use config::{ArchiveApiConfig, ConfigError};
pub use error::ArchiveApiError;

use std::time::Duration;

use url::Url;

/// Top-level archive API client. Holds the sub-client for each endpoint.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    catalog: catalog::CatalogClient,
    access: access::AccessClient,
}

impl ArchiveClient {
    /// Create a new archive API client from configuration.
    pub fn new(config: &ArchiveApiConfig) -> Result<Self, ArchiveApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ArchiveApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            catalog: catalog::CatalogClient::new(http.clone(), config.base_url.clone()),
            access: access::AccessClient::new(http, config.base_url.clone()),
        })
    }

    /// Access the catalog listing client.
    pub fn catalog(&self) -> &catalog::CatalogClient {
        &self.catalog
    }

    /// Access the access-check client.
    pub fn access(&self) -> &access::AccessClient {
        &self.access
    }
}

/// Append `segments` to the path of `base`.
///
/// Each segment is percent-encoded, so an identifier can never escape its
/// path position.
pub(crate) fn endpoint_url<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, ArchiveApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            ArchiveApiError::Config(ConfigError::InvalidUrl(
                "base_url".to_string(),
                format!("{base} cannot be used as a base URL"),
            ))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

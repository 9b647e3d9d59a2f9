//! Typed client for the archive catalog listing.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/v1/archive?category={tag}` | Flat list of archive documents |
//!
//! The listing is fetched once when the archive view mounts (or on explicit
//! refresh). Transport failures are retried with backoff; status failures
//! are not.

use archive_core::document::CatalogListing;
use archive_core::{ArchiveDocument, CatalogError, CatalogSource, CategoryTag};

use crate::error::ArchiveApiError;
use crate::retry::RetryPolicy;

/// Client for the catalog listing endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: url::Url,
    retry: RetryPolicy,
}

impl CatalogClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self {
            http,
            base_url,
            retry: RetryPolicy::default(),
        }
    }

    /// List every archive document tagged with `category`.
    ///
    /// Calls `GET {base_url}/api/v1/archive?category={category}`. Accepts
    /// either a bare JSON array or an envelope object (`documents`, `data`
    /// or `content`).
    pub async fn list(&self, category: &CategoryTag) -> Result<Vec<ArchiveDocument>, ArchiveApiError> {
        let endpoint = "GET /archive";
        let mut url = crate::endpoint_url(&self.base_url, ["api", "v1", "archive"])?;
        url.query_pairs_mut().append_pair("category", category.as_str());

        let resp = self
            .retry
            .send(endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| ArchiveApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ArchiveApiError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let listing: CatalogListing = resp.json().await.map_err(|e| ArchiveApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        let documents = listing.into_documents();
        tracing::debug!(%category, documents = documents.len(), "catalog listing fetched");
        Ok(documents)
    }
}

impl CatalogSource for CatalogClient {
    async fn list_documents(
        &self,
        category: &CategoryTag,
    ) -> Result<Vec<ArchiveDocument>, CatalogError> {
        self.list(category).await.map_err(CatalogError::from)
    }
}

//! Typed client for the per-document access check.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/v1/archive/{id}/access` | Decide whether the caller may open a document |
//!
//! ## Responses
//!
//! | Status | Meaning | Returned as |
//! |--------|---------|-------------|
//! | 200 | granted; body carries the content locator | `Ok(AccessGrant)` |
//! | 401 | no valid session | `Err(ApiError { status: 401 })` |
//! | 403 | free-view quota exhausted, no covering subscription | `Err(ApiError { status: 403 })` |
//! | other | server fault | `Err(ApiError { .. })` |
//!
//! The client does not interpret denials; the access controller does.
//! Access checks are never retried here.

use archive_core::{AccessCheckError, AccessGateway, AccessGrant, BearerToken, DocumentId};

use crate::error::ArchiveApiError;

/// Client for the access-check endpoint.
#[derive(Debug, Clone)]
pub struct AccessClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl AccessClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Ask whether the caller may open `document`.
    ///
    /// Calls `GET {base_url}/api/v1/archive/{id}/access`, with
    /// `Authorization: Bearer …` only when `credential` is present.
    pub async fn check(
        &self,
        document: &DocumentId,
        credential: Option<&BearerToken>,
    ) -> Result<AccessGrant, ArchiveApiError> {
        let endpoint = format!("GET /archive/{}/access", document.as_str());
        let url = crate::endpoint_url(
            &self.base_url,
            ["api", "v1", "archive", document.as_str(), "access"],
        )?;

        let mut request = self.http.get(url);
        if let Some(token) = credential {
            request = request.bearer_auth(token.expose());
        }

        let resp = request.send().await.map_err(|e| ArchiveApiError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ArchiveApiError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| ArchiveApiError::Deserialization {
            endpoint,
            source: e,
        })
    }
}

impl AccessGateway for AccessClient {
    async fn check_access(
        &self,
        document: &DocumentId,
        credential: Option<&BearerToken>,
    ) -> Result<AccessGrant, AccessCheckError> {
        self.check(document, credential)
            .await
            .map_err(AccessCheckError::from)
    }
}

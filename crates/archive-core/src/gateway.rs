//! # Collaborator Traits
//!
//! The archive core talks to exactly two network collaborators: the catalog
//! listing and the per-document access check. Both are abstracted here so
//! that the browsing state machine never depends on HTTP, and so that tests
//! can drive resolution order by hand.
//!
//! ## Contract
//!
//! Gateways report *what happened on the wire* and nothing more. An access
//! gateway returns the raw HTTP status of a non-success response; deciding
//! that 401 means "log in" and 403 means "subscribe" is the access
//! controller's job, done in one place.

use std::future::Future;

use thiserror::Error;

use crate::document::{AccessGrant, ArchiveDocument};
use crate::identity::{BearerToken, CategoryTag, DocumentId};

/// Failure of an access check, before classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessCheckError {
    /// The server answered with a non-success status.
    #[error("access check returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The request never produced a response (DNS, connect, timeout).
    #[error("access check transport failure: {0}")]
    Transport(String),
    /// A success response carried an unreadable body.
    #[error("access check response unreadable: {0}")]
    Decode(String),
}

/// Failure of a catalog listing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The server answered with a non-success status.
    #[error("catalog listing returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The request never produced a response.
    #[error("catalog listing transport failure: {0}")]
    Transport(String),
    /// The response body was not a catalog listing.
    #[error("catalog listing unreadable: {0}")]
    Decode(String),
}

/// Source of the flat archive catalog.
pub trait CatalogSource: Send + Sync {
    /// List every archive document carrying `category`.
    fn list_documents(
        &self,
        category: &CategoryTag,
    ) -> impl Future<Output = Result<Vec<ArchiveDocument>, CatalogError>> + Send;
}

/// Per-document access check.
///
/// `credential` is `None` for anonymous visitors; implementations must then
/// send no credential at all, so the server evaluates the anonymous quota.
pub trait AccessGateway: Send + Sync + 'static {
    /// Ask whether the caller may open `document`.
    fn check_access(
        &self,
        document: &DocumentId,
        credential: Option<&BearerToken>,
    ) -> impl Future<Output = Result<AccessGrant, AccessCheckError>> + Send;
}

//! Archive API client error types.

use archive_core::{AccessCheckError, CatalogError};

/// Errors from archive API calls.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The archive API returned a non-2xx status.
    #[error("archive API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl From<ArchiveApiError> for AccessCheckError {
    fn from(err: ArchiveApiError) -> Self {
        match err {
            ArchiveApiError::ApiError { status, body, .. } => Self::Status { status, body },
            ArchiveApiError::Deserialization { source, .. } => Self::Decode(source.to_string()),
            other @ (ArchiveApiError::Http { .. } | ArchiveApiError::Config(_)) => {
                Self::Transport(other.to_string())
            }
        }
    }
}

impl From<ArchiveApiError> for CatalogError {
    fn from(err: ArchiveApiError) -> Self {
        match err {
            ArchiveApiError::ApiError { status, body, .. } => Self::Status { status, body },
            ArchiveApiError::Deserialization { source, .. } => Self::Decode(source.to_string()),
            other @ (ArchiveApiError::Http { .. } | ArchiveApiError::Config(_)) => {
                Self::Transport(other.to_string())
            }
        }
    }
}

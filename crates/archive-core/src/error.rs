//! # Error Types
//!
//! Errors raised by the archive core. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Note what is *not* here: access-check outcomes. Authentication and
//! subscription denials are ordinary results of an access check, not
//! errors, and live in `archive-state` as a closed outcome enum.

use thiserror::Error;

/// Top-level error type for the archive core.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A date field could not be interpreted.
    #[error("date error: {0}")]
    Date(#[from] DateParseError),

    /// An identifier failed validation.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A catalog document could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error while reading a placement date from catalog data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Neither a publication date nor an upload timestamp is present.
    #[error("document has neither a publication date nor an upload timestamp")]
    Missing,

    /// The chosen date field is present but matches no accepted format.
    #[error("unrecognised date {value:?} in {field}")]
    Unrecognised {
        /// Which field was used (`publicationDate` or `uploadedAt`).
        field: &'static str,
        /// The raw value as received.
        value: String,
    },
}

//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers that cross crate boundaries.
//! You cannot pass a `ContentLocator` where a `DocumentId` is expected,
//! and a `BearerToken` never shows up in `Debug` output.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ArchiveError;

/// Identifier of one archive document, as assigned by the catalog service.
///
/// Opaque to the client. Kept as a string because the storefront backend
/// issues database object ids, not UUIDs. Decoding goes through
/// [`DocumentId::new`], so catalog ids are trimmed and validated too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document identifier, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, ArchiveError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ArchiveError::InvalidIdentifier(
                "document id must not be blank".to_string(),
            ));
        }
        if trimmed.contains('/') {
            return Err(ArchiveError::InvalidIdentifier(format!(
                "document id must not contain '/': {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "document:{}", self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = ArchiveError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl std::str::FromStr for DocumentId {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque locator of a document's scanned content.
///
/// The catalog listing carries one as a reference for the access check;
/// a successful access check returns the one the viewer may actually open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLocator(pub String);

impl ContentLocator {
    /// Access the raw locator.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category tag used to filter the catalog listing (e.g. `magazine`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTag(pub String);

impl CategoryTag {
    /// Access the raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer credential of an authenticated visitor.
///
/// The token is zeroized on drop and redacted from `Debug`. Anonymous
/// visitors have no `BearerToken` at all; an empty token is not a valid
/// stand-in for "anonymous".
#[derive(Clone)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap a raw token. Returns `None` for a blank token.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Access the raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_trims_and_rejects_blank() {
        assert_eq!(DocumentId::new("  abc ").unwrap().as_str(), "abc");
        assert!(DocumentId::new("   ").is_err());
        assert!(DocumentId::new("a/b").is_err());
    }

    #[test]
    fn document_id_decoding_validates() {
        let id: DocumentId = serde_json::from_str(r#"" 64f1 ""#).unwrap();
        assert_eq!(id.as_str(), "64f1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""64f1""#);

        assert!(serde_json::from_str::<DocumentId>(r#""   ""#).is_err());
        assert!(serde_json::from_str::<DocumentId>(r#""x/../y""#).is_err());
    }

    #[test]
    fn document_id_display_is_namespaced() {
        let id: DocumentId = "64f1c0".parse().unwrap();
        assert_eq!(id.to_string(), "document:64f1c0");
    }

    #[test]
    fn bearer_token_is_redacted() {
        let token = BearerToken::new("secret-value").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret-value"));
        assert_eq!(token.expose(), "secret-value");
    }

    #[test]
    fn blank_bearer_token_means_anonymous() {
        assert!(BearerToken::new("").is_none());
        assert!(BearerToken::new("  ").is_none());
    }
}

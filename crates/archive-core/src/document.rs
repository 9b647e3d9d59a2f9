//! # Archive Document Records
//!
//! Read-only records as returned by the catalog listing endpoint, and the
//! grant body returned by a successful access check.
//!
//! Fields use `#[serde(default)]` for resilience against schema evolution on
//! the storefront backend. Unknown fields are ignored;
//! `deny_unknown_fields` is intentionally NOT used.
//!
//! One malformed record never sinks the listing. Date fields of any JSON
//! type are kept as raw text and fail later, at placement, so the indexer
//! counts the document as skipped. A record that cannot be decoded at all
//! (no usable id, no title) is dropped from the listing with a warning.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ArchiveError, DateParseError};
use crate::identity::{CategoryTag, ContentLocator, DocumentId};
use crate::temporal::{PlacementDate, PlacementSource};

/// One scanned periodical issue in the archive catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDocument {
    #[serde(alias = "_id")]
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Raw publication date. Authoritative for placement when present.
    #[serde(default, deserialize_with = "raw_date")]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryTag>,
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Opaque reference used only by the access check.
    #[serde(alias = "fileUrl")]
    pub content_ref: ContentLocator,
    /// Raw upload timestamp. Placement fallback.
    #[serde(default, alias = "createdAt", deserialize_with = "raw_date")]
    pub uploaded_at: Option<String>,
}

impl ArchiveDocument {
    /// The date this document is filed under, and which field it came from.
    pub fn placement(&self) -> Result<(PlacementDate, PlacementSource), DateParseError> {
        PlacementDate::choose(self.publication_date.as_deref(), self.uploaded_at.as_deref())
    }
}

/// Read a date field of any JSON type. Strings pass through; other
/// values keep their JSON text, which no date format accepts.
fn raw_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Decode listing entries one at a time, dropping the ones that are not
/// documents.
fn tolerant_records<'de, D>(deserializer: D) -> Result<Vec<ArchiveDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<Value>::deserialize(deserializer)?;
    let total = records.len();
    let documents: Vec<ArchiveDocument> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value(record) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(position, error = %e, "dropping undecodable catalog record");
                None
            }
        })
        .collect();
    if documents.len() < total {
        tracing::warn!(
            dropped = total - documents.len(),
            total,
            "catalog listing contained undecodable records"
        );
    }
    Ok(documents)
}

/// Body of a successful access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Locator the viewer is allowed to open.
    #[serde(alias = "url")]
    pub content_url: ContentLocator,
    /// Free views left on this document for the caller, when the server
    /// reports it. Informational only; the server enforces the quota.
    #[serde(default)]
    pub remaining_free_views: Option<u32>,
}

/// Shapes the catalog listing has been observed to take: a bare array, or
/// an envelope object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogListing {
    Bare(#[serde(deserialize_with = "tolerant_records")] Vec<ArchiveDocument>),
    Envelope {
        #[serde(alias = "data", alias = "content", deserialize_with = "tolerant_records")]
        documents: Vec<ArchiveDocument>,
    },
}

impl CatalogListing {
    /// Flatten either shape into the document list.
    pub fn into_documents(self) -> Vec<ArchiveDocument> {
        match self {
            Self::Bare(docs) => docs,
            Self::Envelope { documents } => documents,
        }
    }
}

/// Decode a catalog listing from JSON text.
pub fn parse_catalog(json: &str) -> Result<Vec<ArchiveDocument>, ArchiveError> {
    let listing: CatalogListing = serde_json::from_str(json)?;
    Ok(listing.into_documents())
}

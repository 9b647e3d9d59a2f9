//! # Placement Dates
//!
//! Every archive document is filed under exactly one date: its publication
//! date when the catalog provides one, its upload timestamp otherwise. This
//! module owns that choice and the lenient parsing of the raw strings the
//! catalog service returns.
//!
//! ## Accepted Formats
//!
//! Catalog data is external and loosely typed, so parsing is lenient:
//!
//! - RFC 3339 with any offset (`2023-05-15T08:30:00+02:00`), normalised to UTC.
//! - Date and time without offset (`2023-05-15T08:30:00`, optional fraction,
//!   `T` or space separator), read as UTC.
//! - Bare calendar date (`2023-05-15`), read as midnight UTC.
//!
//! Anything else is a [`DateParseError::Unrecognised`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DateParseError;

/// Which document field a [`PlacementDate`] was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementSource {
    /// The issue's publication date.
    Publication,
    /// The upload timestamp (fallback when no publication date exists).
    Upload,
}

impl PlacementSource {
    /// Wire name of the field this source reads.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Publication => "publicationDate",
            Self::Upload => "uploadedAt",
        }
    }
}

impl std::fmt::Display for PlacementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// The UTC instant a document is bucketed and ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlacementDate(DateTime<Utc>);

impl PlacementDate {
    /// Wrap an existing UTC instant.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse a raw catalog date string.
    ///
    /// # Errors
    ///
    /// Returns [`DateParseError::Unrecognised`] (tagged with `source`) when
    /// the value matches none of the accepted formats.
    pub fn parse(raw: &str, source: PlacementSource) -> Result<Self, DateParseError> {
        let value = raw.trim();
        parse_lenient(value)
            .map(Self)
            .ok_or_else(|| DateParseError::Unrecognised {
                field: source.field_name(),
                value: raw.to_string(),
            })
    }

    /// Choose and parse the placement date from a publication date and an
    /// upload timestamp.
    ///
    /// A present (non-blank) publication date is authoritative: if it does
    /// not parse, the upload timestamp is NOT consulted.
    pub fn choose(
        publication: Option<&str>,
        uploaded: Option<&str>,
    ) -> Result<(Self, PlacementSource), DateParseError> {
        match (present(publication), present(uploaded)) {
            (Some(p), _) => {
                Self::parse(p, PlacementSource::Publication).map(|d| (d, PlacementSource::Publication))
            }
            (None, Some(u)) => {
                Self::parse(u, PlacementSource::Upload).map(|d| (d, PlacementSource::Upload))
            }
            (None, None) => Err(DateParseError::Missing),
        }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month, 1-12.
    pub fn month(&self) -> u8 {
        // chrono guarantees 1..=12.
        self.0.month() as u8
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

/// A blank date string counts as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

impl std::fmt::Display for PlacementDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

fn parse_lenient(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

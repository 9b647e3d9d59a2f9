//! # Year → Month Catalog Index
//!
//! Turns the flat catalog listing into the sparse, sorted
//! `year → month → documents` view the archive browser navigates.
//!
//! ## Invariants
//!
//! - **Sparse.** A year key exists only if at least one of its months holds
//!   at least one document. No padded calendar.
//! - **Descending presentation.** Years, months within a year, and documents
//!   within a month are all enumerated newest first. Documents with equal
//!   placement dates keep their input order.
//! - **Pure.** [`build_index`] performs no I/O and never mutates its input.
//!   The same list in the same order always yields an equal index.
//! - **Defensive.** Documents whose placement date cannot be read are left
//!   out and counted in [`YearMonthIndex::skipped()`]; they never cause an
//!   error.
//!
//! ## Memoization
//!
//! [`IndexCache`] holds the last computed index together with the
//! [`Catalog`] it was computed from, and recomputes only when handed a
//! catalog with a different identity.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::document::ArchiveDocument;
use crate::identity::DocumentId;
use crate::temporal::PlacementDate;

// ─── Index ───────────────────────────────────────────────────────────

/// Derived, immutable year → month → documents view of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearMonthIndex {
    years: BTreeMap<i32, BTreeMap<u8, Vec<ArchiveDocument>>>,
    skipped: usize,
}

impl YearMonthIndex {
    /// Years holding at least one document, newest first.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().rev().copied()
    }

    /// Months of `year` holding at least one document, newest first.
    /// Empty when the year is absent.
    pub fn months(&self, year: i32) -> impl Iterator<Item = u8> + '_ {
        self.years
            .get(&year)
            .into_iter()
            .flat_map(|months| months.keys().rev().copied())
    }

    /// Documents filed under `year`/`month`, newest first. Empty when the
    /// bucket is absent.
    pub fn documents(&self, year: i32, month: u8) -> &[ArchiveDocument] {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `year` has any documents.
    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// The most recent (year, month) bucket, if any.
    pub fn latest(&self) -> Option<(i32, u8)> {
        let (year, months) = self.years.iter().next_back()?;
        let month = months.keys().next_back()?;
        Some((*year, *month))
    }

    /// Find the bucket and record of an indexed document.
    pub fn locate(&self, id: &DocumentId) -> Option<(i32, u8, &ArchiveDocument)> {
        self.years.iter().find_map(|(year, months)| {
            months.iter().find_map(|(month, docs)| {
                docs.iter()
                    .find(|doc| &doc.id == id)
                    .map(|doc| (*year, *month, doc))
            })
        })
    }

    /// Total number of indexed documents.
    pub fn len(&self) -> usize {
        self.years
            .values()
            .flat_map(|months| months.values())
            .map(Vec::len)
            .sum()
    }

    /// Whether no document made it into the index.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Number of input documents left out for lack of a readable date.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Build the year → month index of `documents`.
///
/// Each document is placed by its publication date, or by its upload
/// timestamp when it has no publication date. Documents with neither, or
/// with an unreadable chosen date, are skipped.
pub fn build_index(documents: &[ArchiveDocument]) -> YearMonthIndex {
    let mut years: BTreeMap<i32, BTreeMap<u8, Vec<(PlacementDate, &ArchiveDocument)>>> =
        BTreeMap::new();
    let mut skipped = 0usize;

    for doc in documents {
        match doc.placement() {
            Ok((date, _source)) => {
                years
                    .entry(date.year())
                    .or_default()
                    .entry(date.month())
                    .or_default()
                    .push((date, doc));
            }
            Err(reason) => {
                skipped += 1;
                tracing::debug!(document_id = %doc.id, %reason, "skipping document without usable date");
            }
        }
    }

    let years = years
        .into_iter()
        .map(|(year, months)| {
            let months = months
                .into_iter()
                .map(|(month, mut bucket)| {
                    // Stable: equal dates keep input order.
                    bucket.sort_by(|a, b| b.0.cmp(&a.0));
                    (month, bucket.into_iter().map(|(_, doc)| doc.clone()).collect())
                })
                .collect();
            (year, months)
        })
        .collect();

    YearMonthIndex { years, skipped }
}

// ─── Summary ─────────────────────────────────────────────────────────

/// Document count of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: u8,
    pub count: usize,
}

/// Per-month document counts of one year, for sidebar navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    /// Months newest first; only months with documents.
    pub month_counts: Vec<MonthCount>,
}

impl YearSummary {
    /// Documents in the whole year.
    pub fn total(&self) -> usize {
        self.month_counts.iter().map(|m| m.count).sum()
    }
}

/// Read-only projection of `index` into per-year month counts, newest first.
pub fn summarize(index: &YearMonthIndex) -> Vec<YearSummary> {
    index
        .years
        .iter()
        .rev()
        .map(|(year, months)| YearSummary {
            year: *year,
            month_counts: months
                .iter()
                .rev()
                .map(|(month, docs)| MonthCount {
                    month: *month,
                    count: docs.len(),
                })
                .collect(),
        })
        .collect()
}

// ─── Catalog + cache ─────────────────────────────────────────────────

/// Shared, immutable catalog listing.
///
/// Cloning a `Catalog` shares the same list; two catalogs are the "same
/// source" only if they share it. Re-fetching the listing produces a new
/// identity even if the contents happen to be equal.
#[derive(Debug, Clone)]
pub struct Catalog {
    documents: Arc<[ArchiveDocument]>,
}

impl Catalog {
    /// Wrap a freshly loaded listing.
    pub fn new(documents: Vec<ArchiveDocument>) -> Self {
        Self {
            documents: documents.into(),
        }
    }

    /// The documents, in listing order.
    pub fn documents(&self) -> &[ArchiveDocument] {
        &self.documents
    }

    /// Whether `self` and `other` share the same underlying listing.
    pub fn same_source(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.documents, &other.documents)
    }

    /// Number of documents in the listing.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl From<Vec<ArchiveDocument>> for Catalog {
    fn from(documents: Vec<ArchiveDocument>) -> Self {
        Self::new(documents)
    }
}

/// Memoized [`build_index`] keyed on catalog identity.
#[derive(Debug, Default)]
pub struct IndexCache {
    source: Option<Catalog>,
    index: Arc<YearMonthIndex>,
    rebuilds: u64,
}

impl IndexCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The index of `catalog`, recomputed only if `catalog` is not the
    /// source of the cached index.
    pub fn get(&mut self, catalog: &Catalog) -> Arc<YearMonthIndex> {
        let fresh = self
            .source
            .as_ref()
            .is_some_and(|cached| cached.same_source(catalog));
        if !fresh {
            let index = build_index(catalog.documents());
            self.rebuilds += 1;
            tracing::debug!(
                documents = catalog.len(),
                indexed = index.len(),
                skipped = index.skipped(),
                rebuilds = self.rebuilds,
                "rebuilt archive index"
            );
            self.index = Arc::new(index);
            // Holding the source keeps its allocation alive, so a later
            // catalog can never reuse the address and alias as "same".
            self.source = Some(catalog.clone());
        }
        Arc::clone(&self.index)
    }

    /// The last computed index (empty before the first `get`).
    pub fn current(&self) -> Arc<YearMonthIndex> {
        Arc::clone(&self.index)
    }

    /// How many times the index has been computed.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ContentLocator, DocumentId};

    fn doc(id: &str, publication: Option<&str>, uploaded: Option<&str>) -> ArchiveDocument {
        ArchiveDocument {
            id: DocumentId::new(id).unwrap(),
            title: format!("Issue {id}"),
            subtitle: None,
            publication_date: publication.map(str::to_string),
            category: None,
            cover_image: None,
            content_ref: ContentLocator(format!("{id}.pdf")),
            uploaded_at: uploaded.map(str::to_string),
        }
    }

    fn ids(docs: &[ArchiveDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn empty_catalog_gives_empty_index() {
        let index = build_index(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.latest(), None);
        assert!(summarize(&index).is_empty());
    }

    #[test]
    fn same_month_orders_newest_first() {
        let index = build_index(&[
            doc("second", Some("2023-05-02"), None),
            doc("fifteenth", Some("2023-05-15"), None),
        ]);
        assert_eq!(index.years().collect::<Vec<_>>(), vec![2023]);
        assert_eq!(index.months(2023).collect::<Vec<_>>(), vec![5]);
        assert_eq!(ids(index.documents(2023, 5)), vec!["fifteenth", "second"]);
    }

    #[test]
    fn years_and_months_are_presented_descending() {
        let index = build_index(&[
            doc("a", Some("2021-03-01"), None),
            doc("b", Some("2023-01-10"), None),
            doc("c", Some("2023-11-10"), None),
            doc("d", Some("2022-07-04"), None),
        ]);
        assert_eq!(index.years().collect::<Vec<_>>(), vec![2023, 2022, 2021]);
        assert_eq!(index.months(2023).collect::<Vec<_>>(), vec![11, 1]);
        assert_eq!(index.latest(), Some((2023, 11)));
        assert_eq!(index.months(1999).count(), 0);
        assert!(index.documents(1999, 1).is_empty());
    }

    #[test]
    fn upload_timestamp_is_fallback_only() {
        let index = build_index(&[
            // Publication date decides, upload timestamp ignored.
            doc("pub", Some("2020-02-02"), Some("2024-04-04T10:00:00Z")),
            // No publication date: upload timestamp decides.
            doc("up", None, Some("2024-04-04T10:00:00Z")),
        ]);
        assert_eq!(ids(index.documents(2020, 2)), vec!["pub"]);
        assert_eq!(ids(index.documents(2024, 4)), vec!["up"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn locate_finds_bucket_of_document() {
        let index = build_index(&[
            doc("a", Some("2021-03-01"), None),
            doc("b", Some("2023-11-10"), None),
            doc("lost", Some("never"), None),
        ]);
        let (year, month, found) = index.locate(&DocumentId::new("a").unwrap()).unwrap();
        assert_eq!((year, month), (2021, 3));
        assert_eq!(found.title, "Issue a");
        assert!(index.locate(&DocumentId::new("lost").unwrap()).is_none());
    }

    #[test]
    fn unreadable_dates_are_skipped() {
        let index = build_index(&[
            doc("ok", Some("2023-05-02"), None),
            doc("garbage", Some("soon"), Some("2023-05-03")),
            doc("none", None, None),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 2);
        assert_eq!(ids(index.documents(2023, 5)), vec!["ok"]);
    }

    #[test]
    fn non_string_dates_from_the_wire_are_skipped() {
        let docs = crate::document::parse_catalog(
            r#"[{"id":"a","title":"A","contentRef":"a.pdf","publicationDate":20230515},
                {"id":"b","title":"B","contentRef":"b.pdf","publicationDate":"2023-05-02"},
                {"id":"c","title":"C","contentRef":"c.pdf","createdAt":{"$date":"2023-05-03"}}]"#,
        )
        .unwrap();
        let index = build_index(&docs);
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 2);
        assert_eq!(ids(index.documents(2023, 5)), vec!["b"]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let index = build_index(&[
            doc("first", Some("2023-05-02"), None),
            doc("second", Some("2023-05-02"), None),
            doc("third", Some("2023-05-02"), None),
        ]);
        assert_eq!(ids(index.documents(2023, 5)), vec!["first", "second", "third"]);
    }

    #[test]
    fn summary_counts_per_month() {
        let index = build_index(&[
            doc("a", Some("2023-05-02"), None),
            doc("b", Some("2023-05-15"), None),
            doc("c", Some("2023-01-15"), None),
            doc("d", Some("2022-12-31"), None),
        ]);
        let summary = summarize(&index);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].year, 2023);
        assert_eq!(
            summary[0].month_counts,
            vec![
                MonthCount { month: 5, count: 2 },
                MonthCount { month: 1, count: 1 }
            ]
        );
        assert_eq!(summary[0].total(), 3);
        assert_eq!(summary[1].year, 2022);
        assert_eq!(summary[1].total(), 1);
    }

    #[test]
    fn cache_rebuilds_only_on_identity_change() {
        let catalog = Catalog::new(vec![doc("a", Some("2023-05-02"), None)]);
        let mut cache = IndexCache::new();

        let first = cache.get(&catalog);
        let again = cache.get(&catalog.clone());
        assert_eq!(cache.rebuilds(), 1);
        assert!(Arc::ptr_eq(&first, &again));

        // Equal contents, new listing: new identity, recomputed.
        let refetched = Catalog::new(vec![doc("a", Some("2023-05-02"), None)]);
        let third = cache.get(&refetched);
        assert_eq!(cache.rebuilds(), 2);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn cache_current_is_empty_before_first_get() {
        let cache = IndexCache::new();
        assert!(cache.current().is_empty());
        assert_eq!(cache.rebuilds(), 0);
    }
}

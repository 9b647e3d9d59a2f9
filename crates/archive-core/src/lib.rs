//! # archive-core — Foundational Types for the Periodical Archive
//!
//! This crate is the leaf of the archive workspace. It defines the document
//! record consumed from the catalog listing, the single placement date each
//! document is filed under, the derived year → month index, and the traits
//! through which the rest of the workspace reaches the two network
//! collaborators (catalog listing and access check).
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `DocumentId`, `ContentLocator`,
//!    `CategoryTag`, `BearerToken`. No bare strings cross crate
//!    boundaries.
//!
//! 2. **One placement date per document.** Publication date if present,
//!    upload timestamp otherwise. Never both. See [`temporal`].
//!
//! 3. **The index is a pure derived view.** [`build_index`] has no side
//!    effects besides logging and never mutates its input. [`IndexCache`]
//!    memoizes it against the identity of the source [`Catalog`].
//!
//! 4. **Collaborators behind traits.** [`CatalogSource`] and
//!    [`AccessGateway`] are implemented over HTTP by `archive-client` and by
//!    in-memory doubles in tests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `archive-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod index;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use document::{AccessGrant, ArchiveDocument};
pub use error::{ArchiveError, DateParseError};
pub use gateway::{AccessCheckError, AccessGateway, CatalogError, CatalogSource};
pub use identity::{BearerToken, CategoryTag, ContentLocator, DocumentId};
pub use index::{
    build_index, summarize, Catalog, IndexCache, MonthCount, YearMonthIndex, YearSummary,
};
pub use temporal::{PlacementDate, PlacementSource};

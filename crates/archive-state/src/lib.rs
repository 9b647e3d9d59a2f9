//! # archive-state — Archive Browsing State Machine
//!
//! Drives one mounted archive page: which year and month the visitor is
//! looking at, the single access check that may be in flight, the overlay
//! that reports its outcome, and the hand-off of granted documents to the
//! viewer.
//!
//! ## Modules
//!
//! - [`access`]: the access controller. Issues checks, cancels superseded
//!   ones, classifies results, and rejects stale ones.
//! - [`browse`]: selection phases and overlays.
//! - [`viewer`]: the viewer widget seam and the single open session.
//! - [`page`]: loading the catalog and mounting or refreshing the page.
//!
//! ## Driving an access check
//!
//! The state machine never awaits. Activating an item returns an
//! [`AccessRequest`]; the host resolves it (inline or on a spawned task)
//! and feeds the [`AccessResolution`] back through [`BrowseState::apply`]:
//!
//! ```ignore
//! let request = state.activate_item(&document, token);
//! let resolution = request.resolve().await;
//! state.apply(resolution);
//! ```

pub mod access;
pub mod browse;
pub mod page;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::{
    AccessController, AccessOutcome, AccessRequest, AccessResolution, GrantedDocument, RequestId,
};
pub use browse::{BrowseError, BrowsePhase, BrowseState, Overlay, Selection};
pub use page::{ArchivePage, CatalogLoadError};
pub use viewer::{TracingViewer, ViewerHandoff, ViewerSession, ViewerWidget};

//! # Archive Browsing State Machine
//!
//! Tracks what the visitor is looking at (year, month), what modal overlay
//! is up, and routes access outcomes to the matching overlay.
//!
//! ## Phases
//!
//! ```text
//! Idle ──select_year──▶ YearSelected(y) ──select_month──▶ MonthSelected(y, m)
//!                            ▲                                  │
//!                            └───────────select_year────────────┘
//! ```
//!
//! Selecting a year always clears the month.
//!
//! ## Overlays
//!
//! ```text
//!                 activate_item
//! (none | any) ───────────────▶ AccessPending ──Granted──────────────▶ ViewerOpen
//!                                     │ ├─────AuthenticationRequired──▶ AuthPrompt
//!                                     │ ├─────SubscriptionRequired────▶ SubscriptionPrompt
//!                                     │ └─────TransientError──────────▶ ErrorPrompt
//!                                     │
//!               dismiss_overlay ◀─────┘  (cancels the check; nothing is shown)
//! ```
//!
//! Outcomes only ever arrive through [`BrowseState::apply`], which first
//! asks the [`AccessController`] whether the resolution is still current.
//! A grant for a superseded or dismissed request never opens the viewer.

use std::sync::Arc;

use archive_core::{
    summarize, AccessGateway, ArchiveDocument, BearerToken, Catalog, DocumentId, IndexCache,
    MonthCount, YearMonthIndex, YearSummary,
};
use serde::Serialize;
use thiserror::Error;

use crate::access::{AccessController, AccessOutcome, AccessRequest, AccessResolution, RequestId};
use crate::viewer::{ViewerHandoff, ViewerSession, ViewerWidget};

// ─── Selection ───────────────────────────────────────────────────────

/// The visitor's year/month selection. A month is never selected without
/// a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    year: Option<i32>,
    month: Option<u8>,
}

impl Selection {
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    /// The phase this selection corresponds to.
    pub fn phase(&self) -> BrowsePhase {
        match (self.year, self.month) {
            (Some(year), Some(month)) => BrowsePhase::MonthSelected { year, month },
            (Some(year), None) => BrowsePhase::YearSelected { year },
            _ => BrowsePhase::Idle,
        }
    }
}

/// Navigation phase of the archive page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrowsePhase {
    /// No year chosen.
    Idle,
    /// A year is chosen; its months are listed.
    YearSelected { year: i32 },
    /// A month is chosen; its documents are listed.
    MonthSelected { year: i32, month: u8 },
}

impl std::fmt::Display for BrowsePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::YearSelected { year } => write!(f, "YEAR_SELECTED({year})"),
            Self::MonthSelected { year, month } => {
                write!(f, "MONTH_SELECTED({year}-{month:02})")
            }
        }
    }
}

// ─── Overlays ────────────────────────────────────────────────────────

/// Modal overlay shown over the archive grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Overlay {
    /// Waiting for the access check of `document_id`.
    AccessPending {
        document_id: DocumentId,
        request_id: RequestId,
    },
    /// The viewer shows `document_id`.
    ViewerOpen { document_id: DocumentId },
    /// Login needed before `document_id` can be opened.
    AuthPrompt { document_id: DocumentId },
    /// Free views used up; a subscription is needed.
    SubscriptionPrompt { document_id: DocumentId },
    /// The check failed for another reason.
    ErrorPrompt {
        document_id: DocumentId,
        message: String,
    },
}

impl Overlay {
    /// The document this overlay concerns.
    pub fn document_id(&self) -> &DocumentId {
        match self {
            Self::AccessPending { document_id, .. }
            | Self::ViewerOpen { document_id }
            | Self::AuthPrompt { document_id }
            | Self::SubscriptionPrompt { document_id }
            | Self::ErrorPrompt { document_id, .. } => document_id,
        }
    }
}

impl std::fmt::Display for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AccessPending { .. } => "ACCESS_PENDING",
            Self::ViewerOpen { .. } => "VIEWER_OPEN",
            Self::AuthPrompt { .. } => "AUTH_PROMPT",
            Self::SubscriptionPrompt { .. } => "SUBSCRIPTION_PROMPT",
            Self::ErrorPrompt { .. } => "ERROR_PROMPT",
        };
        f.write_str(name)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Rejected navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowseError {
    /// A month was chosen before any year.
    #[error("cannot select month {month} before a year is selected")]
    NoYearSelected { month: u8 },
    /// Month outside 1..=12.
    #[error("invalid month {0}; expected 1-12")]
    InvalidMonth(u8),
}

// ─── Browse state ────────────────────────────────────────────────────

/// State of one mounted archive page.
pub struct BrowseState<G, V> {
    catalog: Catalog,
    cache: IndexCache,
    index: Arc<YearMonthIndex>,
    selection: Selection,
    overlay: Option<Overlay>,
    access: AccessController<G>,
    viewer: ViewerHandoff<V>,
}

impl<G, V> std::fmt::Debug for BrowseState<G, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowseState")
            .field("documents", &self.catalog.len())
            .field("phase", &self.selection.phase())
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl<G: AccessGateway, V: ViewerWidget> BrowseState<G, V> {
    /// Start browsing `catalog` in the `Idle` phase with no overlay.
    pub fn new(catalog: Catalog, gateway: Arc<G>, viewer: V) -> Self {
        let mut cache = IndexCache::new();
        let index = cache.get(&catalog);
        Self {
            catalog,
            cache,
            index,
            selection: Selection::default(),
            overlay: None,
            access: AccessController::new(gateway),
            viewer: ViewerHandoff::new(viewer),
        }
    }

    // ── Queries ──

    pub fn phase(&self) -> BrowsePhase {
        self.selection.phase()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn index(&self) -> &YearMonthIndex {
        &self.index
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Per-year month counts for navigation.
    pub fn summary(&self) -> Vec<YearSummary> {
        summarize(&self.index)
    }

    /// Month counts of the selected year, newest first. Empty when idle.
    pub fn visible_months(&self) -> Vec<MonthCount> {
        let Some(year) = self.selection.year else {
            return Vec::new();
        };
        self.index
            .months(year)
            .map(|month| MonthCount {
                month,
                count: self.index.documents(year, month).len(),
            })
            .collect()
    }

    /// Documents of the selected month, newest first. Empty unless a month
    /// is selected.
    pub fn visible_items(&self) -> &[ArchiveDocument] {
        match self.selection.phase() {
            BrowsePhase::MonthSelected { year, month } => self.index.documents(year, month),
            _ => &[],
        }
    }

    /// The open viewer session, if any.
    pub fn viewer_session(&self) -> Option<&ViewerSession> {
        self.viewer.session()
    }

    pub fn viewer(&self) -> &ViewerHandoff<V> {
        &self.viewer
    }

    /// The access check currently awaited, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.access.in_flight()
    }

    // ── Navigation ──

    /// Select `year` and clear any month. Years without documents are
    /// accepted and simply show nothing.
    pub fn select_year(&mut self, year: i32) {
        self.selection = Selection {
            year: Some(year),
            month: None,
        };
        tracing::debug!(phase = %self.selection.phase(), "year selected");
    }

    /// Select `month` within the selected year.
    pub fn select_month(&mut self, month: u8) -> Result<(), BrowseError> {
        if !(1..=12).contains(&month) {
            return Err(BrowseError::InvalidMonth(month));
        }
        let year = self
            .selection
            .year
            .ok_or(BrowseError::NoYearSelected { month })?;
        self.selection = Selection {
            year: Some(year),
            month: Some(month),
        };
        tracing::debug!(phase = %self.selection.phase(), "month selected");
        Ok(())
    }

    // ── Access flow ──

    /// Visitor activated `document`: start its access check.
    ///
    /// Any previous check is cancelled and any open viewer is closed. The
    /// overlay becomes `AccessPending`. Drive the returned request with
    /// [`AccessRequest::resolve`] and hand the result to [`apply`].
    ///
    /// [`apply`]: Self::apply
    pub fn activate_item(
        &mut self,
        document: &ArchiveDocument,
        credential: Option<BearerToken>,
    ) -> AccessRequest<G> {
        self.viewer.close();
        let request = self.access.request_access(document.id.clone(), credential);
        self.overlay = Some(Overlay::AccessPending {
            document_id: document.id.clone(),
            request_id: request.id(),
        });
        tracing::debug!(document_id = %document.id, request_id = %request.id(), "item activated");
        request
    }

    /// Apply a finished access check. Returns whether it changed the
    /// overlay; stale, cancelled and dismissed results return `false` and
    /// leave everything untouched.
    pub fn apply(&mut self, resolution: AccessResolution) -> bool {
        let request_id = resolution.request_id();
        let pending = match &self.overlay {
            Some(Overlay::AccessPending {
                document_id,
                request_id: id,
            }) if *id == request_id => Some(document_id.clone()),
            _ => None,
        };
        let Some(outcome) = self.access.settle(resolution) else {
            return false;
        };
        let Some(document_id) = pending else {
            tracing::debug!(%request_id, "access result arrived without a pending overlay");
            return false;
        };

        let next = match outcome {
            AccessOutcome::Granted(granted) => {
                self.viewer.open(&granted);
                Overlay::ViewerOpen { document_id }
            }
            AccessOutcome::AuthenticationRequired => {
                tracing::info!(%document_id, "access denied: login required");
                Overlay::AuthPrompt { document_id }
            }
            AccessOutcome::SubscriptionRequired => {
                tracing::info!(%document_id, "access denied: subscription required");
                Overlay::SubscriptionPrompt { document_id }
            }
            AccessOutcome::TransientError(message) => Overlay::ErrorPrompt {
                document_id,
                message,
            },
            // `settle` never admits a cancelled outcome.
            AccessOutcome::Cancelled => return false,
        };
        self.overlay = Some(next);
        true
    }

    /// Close the current overlay.
    ///
    /// Cancels any in-flight check. Only dismissing `ViewerOpen` closes the
    /// viewer. Returns whether an overlay was up.
    pub fn dismiss_overlay(&mut self) -> bool {
        self.access.cancel_in_flight();
        match self.overlay.take() {
            Some(overlay) => {
                if matches!(overlay, Overlay::ViewerOpen { .. }) {
                    self.viewer.close();
                }
                tracing::debug!(%overlay, "overlay dismissed");
                true
            }
            None => false,
        }
    }

    /// The page is going away: cancel the in-flight check, close the viewer,
    /// and drop any overlay. Selection is kept.
    pub fn leave(&mut self) {
        self.access.cancel_in_flight();
        self.viewer.close();
        self.overlay = None;
    }

    // ── Catalog ──

    /// Replace the catalog after a refresh. The index is recomputed only if
    /// `catalog` is a different listing; selection and overlay are kept.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.index = self.cache.get(&catalog);
        self.catalog = catalog;
    }

    /// How many times the index has been computed.
    pub fn index_rebuilds(&self) -> u64 {
        self.cache.rebuilds()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

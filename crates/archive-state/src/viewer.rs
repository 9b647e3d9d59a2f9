//! Hand-off of a granted document to the embedded document viewer.
//!
//! The viewer itself is an opaque widget behind [`ViewerWidget`]. This
//! module only tracks the single open [`ViewerSession`] and makes sure the
//! widget is told to release the document when the session ends.

use archive_core::{ContentLocator, DocumentId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::access::GrantedDocument;

/// A document viewer that can display content from a locator.
pub trait ViewerWidget: Send {
    /// Start displaying the document at `locator`.
    fn open(&mut self, locator: &ContentLocator);
    /// Release the currently displayed document.
    fn close(&mut self);
}

/// The currently open viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSession {
    pub document_id: DocumentId,
    pub locator: ContentLocator,
    pub opened_at: DateTime<Utc>,
}

/// Owns the viewer widget and at most one open session.
#[derive(Debug)]
pub struct ViewerHandoff<V> {
    widget: V,
    session: Option<ViewerSession>,
}

impl<V: ViewerWidget> ViewerHandoff<V> {
    pub fn new(widget: V) -> Self {
        Self {
            widget,
            session: None,
        }
    }

    /// Open `granted` in the viewer, closing any previous session first.
    pub fn open(&mut self, granted: &GrantedDocument) -> &ViewerSession {
        self.close();
        self.widget.open(&granted.locator);
        tracing::info!(document_id = %granted.document_id, "viewer opened");
        self.session.insert(ViewerSession {
            document_id: granted.document_id.clone(),
            locator: granted.locator.clone(),
            opened_at: Utc::now(),
        })
    }

    /// End the current session. Idempotent; returns the closed session.
    pub fn close(&mut self) -> Option<ViewerSession> {
        let session = self.session.take()?;
        self.widget.close();
        tracing::debug!(document_id = %session.document_id, "viewer closed");
        Some(session)
    }

    pub fn session(&self) -> Option<&ViewerSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn widget(&self) -> &V {
        &self.widget
    }
}

/// Viewer that records hand-offs in the log. Used by the command-line host,
/// which has no embedded renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingViewer;

impl ViewerWidget for TracingViewer {
    fn open(&mut self, locator: &ContentLocator) {
        tracing::info!(%locator, "document handed to viewer");
    }

    fn close(&mut self) {
        tracing::debug!("viewer released document");
    }
}

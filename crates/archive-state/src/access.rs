//! # Access Controller
//!
//! Owns the single in-flight access check of a browsing session, its
//! cancellation, and the classification of its result.
//!
//! ## Lifecycle of a request
//!
//! ```text
//! request_access ──▶ AccessRequest ──resolve()──▶ AccessResolution ──settle()──▶ Option<AccessOutcome>
//!       │                                                                 ▲
//!       └── cancels the previous in-flight request ───────────────────────┘
//!                                  (its resolution is discarded here)
//! ```
//!
//! ## Invariants
//!
//! - At most one request is in flight per controller. Issuing a new one
//!   fires the previous one's cancellation token first.
//! - Only the last-issued request can produce an outcome. [`settle`] drops
//!   any resolution whose request id is not the in-flight one, or whose token
//!   was cancelled, even if it carries a grant and arrives late.
//! - Classification happens exactly once, here, by response status:
//!   401 → `AuthenticationRequired`, 403 → `SubscriptionRequired`, any other
//!   failure → `TransientError`. Nothing downstream inspects raw errors.
//!
//! [`settle`]: AccessController::settle

use std::sync::Arc;

use archive_core::{
    AccessCheckError, AccessGateway, AccessGrant, BearerToken, ContentLocator, DocumentId,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

// ─── Identifiers and outcomes ────────────────────────────────────────

/// Monotonic identifier of an access request within one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestId(u64);

impl RequestId {
    /// The numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "access-request:{}", self.0)
    }
}

/// A document the visitor has been granted, with the locator to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantedDocument {
    pub document_id: DocumentId,
    pub locator: ContentLocator,
    /// Free views left, when the server reported it.
    pub remaining_free_views: Option<u32>,
}

/// Closed set of results of one access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AccessOutcome {
    /// The server granted access.
    Granted(GrantedDocument),
    /// The caller has no valid session (HTTP 401). Remedy: log in.
    AuthenticationRequired,
    /// Free-view quota exhausted and no covering subscription (HTTP 403).
    /// Remedy: subscribe.
    SubscriptionRequired,
    /// Anything else, including network failure. Carries a message fit for
    /// display. Retried only by the visitor activating the item again.
    TransientError(String),
    /// Superseded or dismissed before resolution. Never displayed.
    Cancelled,
}

impl AccessOutcome {
    /// Classify a raw gateway result.
    pub fn classify(document_id: &DocumentId, result: Result<AccessGrant, AccessCheckError>) -> Self {
        match result {
            Ok(grant) => Self::Granted(GrantedDocument {
                document_id: document_id.clone(),
                locator: grant.content_url,
                remaining_free_views: grant.remaining_free_views,
            }),
            Err(AccessCheckError::Status { status: 401, .. }) => Self::AuthenticationRequired,
            Err(AccessCheckError::Status { status: 403, .. }) => Self::SubscriptionRequired,
            Err(err) => {
                tracing::warn!(%document_id, error = %err, "access check failed");
                Self::TransientError(transient_message(&err))
            }
        }
    }

    /// Whether this outcome must never reach the UI.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted(_) => f.write_str("GRANTED"),
            Self::AuthenticationRequired => f.write_str("AUTHENTICATION_REQUIRED"),
            Self::SubscriptionRequired => f.write_str("SUBSCRIPTION_REQUIRED"),
            Self::TransientError(_) => f.write_str("TRANSIENT_ERROR"),
            Self::Cancelled => f.write_str("CANCELLED"),
        }
    }
}

fn transient_message(err: &AccessCheckError) -> String {
    match err {
        AccessCheckError::Status { status, .. } => {
            format!("The archive server returned an error (HTTP {status}). Please try again.")
        }
        AccessCheckError::Transport(_) => {
            "The archive server could not be reached. Please try again.".to_string()
        }
        AccessCheckError::Decode(_) => {
            "The archive server sent an unexpected response. Please try again.".to_string()
        }
    }
}

/// The result of driving one [`AccessRequest`] to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessResolution {
    pub(crate) request_id: RequestId,
    pub(crate) document_id: DocumentId,
    pub(crate) outcome: AccessOutcome,
}

impl AccessResolution {
    /// Which request this resolves.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Which document was checked.
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// The classified outcome, before the staleness check in
    /// [`AccessController::settle`].
    pub fn outcome(&self) -> &AccessOutcome {
        &self.outcome
    }
}

// ─── Request handle ──────────────────────────────────────────────────

/// Handle to one issued access check.
///
/// Dropping the handle without resolving it abandons the check. Call
/// [`resolve`](Self::resolve) (directly or on a spawned task) and feed the
/// resolution back through the owner of the controller.
#[derive(Debug)]
pub struct AccessRequest<G> {
    id: RequestId,
    document_id: DocumentId,
    credential: Option<BearerToken>,
    gateway: Arc<G>,
    cancel: CancellationToken,
}

impl<G: AccessGateway> AccessRequest<G> {
    /// This request's identifier.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The document being checked.
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// Cancel this request. No-op if it already completed or was cancelled.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether this request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Perform the access check, racing it against cancellation.
    ///
    /// A cancelled token always wins, including when cancellation happened
    /// before this was first polled.
    pub async fn resolve(self) -> AccessResolution {
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => AccessOutcome::Cancelled,
            result = self.gateway.check_access(&self.document_id, self.credential.as_ref()) => {
                AccessOutcome::classify(&self.document_id, result)
            }
        };
        AccessResolution {
            request_id: self.id,
            document_id: self.document_id,
            outcome,
        }
    }
}

// ─── Controller ──────────────────────────────────────────────────────

#[derive(Debug)]
struct InFlight {
    id: RequestId,
    document_id: DocumentId,
    cancel: CancellationToken,
}

/// Owner of the single in-flight access check of a browsing session.
#[derive(Debug)]
pub struct AccessController<G> {
    gateway: Arc<G>,
    in_flight: Option<InFlight>,
    issued: u64,
}

impl<G: AccessGateway> AccessController<G> {
    /// Create a controller over `gateway`.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            in_flight: None,
            issued: 0,
        }
    }

    /// Cancel any in-flight check and issue a new one for `document_id`.
    ///
    /// `credential` is `None` for anonymous visitors; no credential is sent
    /// then, and the server evaluates the anonymous free-view quota.
    pub fn request_access(
        &mut self,
        document_id: DocumentId,
        credential: Option<BearerToken>,
    ) -> AccessRequest<G> {
        self.issued += 1;
        let id = RequestId(self.issued);
        let cancel = CancellationToken::new();
        self.replace_in_flight(Some(InFlight {
            id,
            document_id: document_id.clone(),
            cancel: cancel.clone(),
        }));
        tracing::debug!(
            request_id = %id,
            %document_id,
            authenticated = credential.is_some(),
            "access check issued"
        );
        AccessRequest {
            id,
            document_id,
            credential,
            gateway: Arc::clone(&self.gateway),
            cancel,
        }
    }

    /// Cancel the in-flight check, if any. Returns whether one was
    /// cancelled. Cancelling a completed check is a no-op.
    pub fn cancel_in_flight(&mut self) -> bool {
        self.replace_in_flight(None)
    }

    /// The id of the in-flight check, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    /// The document of the in-flight check, if any.
    pub fn in_flight_document(&self) -> Option<&DocumentId> {
        self.in_flight.as_ref().map(|f| &f.document_id)
    }

    /// Admit `resolution` if it belongs to the current, uncancelled request.
    ///
    /// This is the only gate through which an access result may change UI
    /// state. `None` means "discard silently".
    pub fn settle(&mut self, resolution: AccessResolution) -> Option<AccessOutcome> {
        let AccessResolution {
            request_id,
            document_id,
            outcome,
        } = resolution;

        let current = match &self.in_flight {
            Some(f) if f.id == request_id => f,
            _ => {
                tracing::debug!(%request_id, %document_id, %outcome, "discarding superseded access result");
                return None;
            }
        };

        if outcome.is_cancelled() || current.cancel.is_cancelled() {
            // The handle was cancelled directly; the slot is dead either way.
            self.in_flight = None;
            tracing::debug!(%request_id, %document_id, "discarding cancelled access result");
            return None;
        }

        self.in_flight = None;
        Some(outcome)
    }

    /// Cancel-then-replace: the only way `in_flight` changes besides
    /// `settle` clearing a completed request.
    fn replace_in_flight(&mut self, next: Option<InFlight>) -> bool {
        let previous = std::mem::replace(&mut self.in_flight, next);
        match previous {
            Some(prev) => {
                prev.cancel.cancel();
                tracing::debug!(
                    request_id = %prev.id,
                    document_id = %prev.document_id,
                    "access check cancelled"
                );
                true
            }
            None => false,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

//! In-memory doubles for the access gateway and the viewer widget.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use archive_core::{
    AccessCheckError, AccessGateway, AccessGrant, ArchiveDocument, BearerToken, ContentLocator,
    DocumentId,
};
use tokio::sync::oneshot;

use crate::viewer::ViewerWidget;

pub(crate) type CheckResult = Result<AccessGrant, AccessCheckError>;

pub(crate) fn doc_id(raw: &str) -> DocumentId {
    DocumentId::new(raw).unwrap()
}

pub(crate) fn document(id: &str, publication: &str) -> ArchiveDocument {
    ArchiveDocument {
        id: doc_id(id),
        title: format!("Issue {id}"),
        subtitle: None,
        publication_date: Some(publication.to_string()),
        category: None,
        cover_image: None,
        content_ref: ContentLocator(format!("{id}.pdf")),
        uploaded_at: None,
    }
}

pub(crate) fn grant(locator: &str) -> CheckResult {
    Ok(AccessGrant {
        content_url: ContentLocator(locator.to_string()),
        remaining_free_views: None,
    })
}

pub(crate) fn denied(status: u16) -> CheckResult {
    Err(AccessCheckError::Status {
        status,
        body: String::new(),
    })
}

enum Script {
    Ready(CheckResult),
    Held(oneshot::Receiver<CheckResult>),
}

/// Gateway answering from per-document scripts. Unscripted documents get a
/// 404.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    scripts: Mutex<HashMap<String, Script>>,
    calls: AtomicUsize,
    credentials: Mutex<Vec<Option<String>>>,
}

impl ScriptedGateway {
    /// Answer the next check of `id` immediately with `result`.
    pub(crate) fn ready(&self, id: &str, result: CheckResult) {
        self.scripts
            .lock()
            .unwrap()
            .insert(id.to_string(), Script::Ready(result));
    }

    /// Hold the next check of `id` until the returned sender fires.
    pub(crate) fn hold(&self, id: &str) -> oneshot::Sender<CheckResult> {
        let (tx, rx) = oneshot::channel();
        self.scripts
            .lock()
            .unwrap()
            .insert(id.to_string(), Script::Held(rx));
        tx
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn credentials_seen(&self) -> Vec<Option<String>> {
        self.credentials.lock().unwrap().clone()
    }
}

impl AccessGateway for ScriptedGateway {
    async fn check_access(
        &self,
        document: &DocumentId,
        credential: Option<&BearerToken>,
    ) -> CheckResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.credentials
            .lock()
            .unwrap()
            .push(credential.map(|t| t.expose().to_string()));
        let script = self.scripts.lock().unwrap().remove(document.as_str());
        match script {
            Some(Script::Ready(result)) => result,
            Some(Script::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(AccessCheckError::Transport("script dropped".into()))),
            None => denied(404),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewerCall {
    Open(String),
    Close,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingViewer {
    pub(crate) calls: Vec<ViewerCall>,
}

impl ViewerWidget for RecordingViewer {
    fn open(&mut self, locator: &ContentLocator) {
        self.calls.push(ViewerCall::Open(locator.as_str().to_string()));
    }

    fn close(&mut self) {
        self.calls.push(ViewerCall::Close);
    }
}

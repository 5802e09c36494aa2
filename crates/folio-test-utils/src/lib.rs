//! Testing utilities for Folio workspace
//!
//! Shared fixtures, in-memory services and event helpers.

#![allow(missing_docs)]

use async_trait::async_trait;
use folio_core::{
    Chapter, Document, DocumentId, DocumentMetadata, ServiceError, TranslationRequest,
    TranslationResponse, TranslationService, WorkspaceEvent,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn doc_id(raw: u64) -> DocumentId {
    DocumentId::new(raw).unwrap()
}

/// Document 42: chapter 0 is `["Hello", "World"]`, chapter 1 has three
/// paragraphs, every paragraph text is unique
pub fn sample_document() -> Document {
    Document::new(
        doc_id(42),
        "sample.pdf",
        vec![
            Chapter::new(Some("Greetings".into()), vec!["Hello".into(), "World".into()]),
            Chapter::new(
                None,
                vec!["Good morning".into(), "Good night".into(), "See you".into()],
            ),
        ],
    )
    .with_metadata(DocumentMetadata {
        author: Some("Ada".into()),
        title: Some("Sample".into()),
        num_pages: Some(3),
    })
}

pub fn empty_document(raw: u64) -> Document {
    Document::new(doc_id(raw), "empty.txt", Vec::new())
}

// ----------------------------------------------------------------------------
// Immediate service
// ----------------------------------------------------------------------------

/// Answers at once from fixed tables
#[derive(Debug, Default)]
pub struct StaticService {
    documents: HashMap<DocumentId, Document>,
    translations: HashMap<String, String>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StaticService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.insert(document.id, document);
        self
    }

    pub fn with_translation(mut self, text: &str, translated: &str) -> Self {
        self.translations.insert(text.to_string(), translated.to_string());
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn translate_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationService for StaticService {
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, ServiceError> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("document {id}")))
    }

    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&request.text) {
            return Err(ServiceError::Status {
                status: 500,
                detail: format!("cannot translate '{}'", request.text),
            });
        }
        let translated = self
            .translations
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| format!("{}:{}", request.target_language, request.text));
        Ok(TranslationResponse::new(translated))
    }
}

// ----------------------------------------------------------------------------
// Scripted service
// ----------------------------------------------------------------------------

/// A translate call parked until the test resolves it
#[derive(Debug)]
pub struct PendingTranslation {
    pub request: TranslationRequest,
    responder: oneshot::Sender<Result<TranslationResponse, ServiceError>>,
}

impl PendingTranslation {
    pub fn text(&self) -> &str {
        &self.request.text
    }

    pub fn resolve(self, result: Result<TranslationResponse, ServiceError>) {
        // The caller may have gone away; nothing to do then
        let _ = self.responder.send(result);
    }

    pub fn succeed(self, translated: impl Into<String>) {
        self.resolve(Ok(TranslationResponse::new(translated)));
    }

    pub fn fail(self) {
        let detail = format!("scripted failure for '{}'", self.request.text);
        self.resolve(Err(ServiceError::Status { status: 502, detail }));
    }
}

/// A document fetch parked until the test resolves it
#[derive(Debug)]
pub struct PendingFetch {
    pub id: DocumentId,
    responder: oneshot::Sender<Result<Document, ServiceError>>,
}

impl PendingFetch {
    pub fn resolve(self, result: Result<Document, ServiceError>) {
        let _ = self.responder.send(result);
    }
}

/// Service whose calls wait for the test to answer them
///
/// Translate calls always park. Fetches answer from the document table unless
/// [`ScriptedService::hold_fetches`] is on.
#[derive(Debug)]
pub struct ScriptedService {
    documents: Mutex<HashMap<DocumentId, Result<Document, ServiceError>>>,
    hold_fetches: AtomicBool,
    translations: mpsc::UnboundedSender<PendingTranslation>,
    fetches: mpsc::UnboundedSender<PendingFetch>,
}

/// Test side of a [`ScriptedService`]
#[derive(Debug)]
pub struct ScriptControl {
    translations: mpsc::UnboundedReceiver<PendingTranslation>,
    fetches: mpsc::UnboundedReceiver<PendingFetch>,
}

impl ScriptedService {
    pub fn new() -> (Arc<Self>, ScriptControl) {
        let (translations_tx, translations_rx) = mpsc::unbounded_channel();
        let (fetches_tx, fetches_rx) = mpsc::unbounded_channel();
        let service = Self {
            documents: Mutex::new(HashMap::new()),
            hold_fetches: AtomicBool::new(false),
            translations: translations_tx,
            fetches: fetches_tx,
        };
        let control = ScriptControl {
            translations: translations_rx,
            fetches: fetches_rx,
        };
        (Arc::new(service), control)
    }

    pub fn insert_document(&self, document: Document) {
        self.documents.lock().insert(document.id, Ok(document));
    }

    pub fn insert_failure(&self, id: DocumentId, error: ServiceError) {
        self.documents.lock().insert(id, Err(error));
    }

    pub fn hold_fetches(&self, hold: bool) {
        self.hold_fetches.store(hold, Ordering::SeqCst);
    }
}

#[async_trait]
impl TranslationService for ScriptedService {
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, ServiceError> {
        if self.hold_fetches.load(Ordering::SeqCst) {
            let (responder, answer) = oneshot::channel();
            self.fetches
                .send(PendingFetch { id, responder })
                .map_err(|_| ServiceError::Transport("script control dropped".into()))?;
            return answer
                .await
                .unwrap_or_else(|_| Err(ServiceError::Transport("fetch abandoned".into())));
        }

        let entry = self.documents.lock().get(&id).cloned();
        entry.unwrap_or_else(|| Err(ServiceError::NotFound(format!("document {id}"))))
    }

    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, ServiceError> {
        let (responder, answer) = oneshot::channel();
        self.translations
            .send(PendingTranslation { request, responder })
            .map_err(|_| ServiceError::Transport("script control dropped".into()))?;
        answer
            .await
            .unwrap_or_else(|_| Err(ServiceError::Transport("request abandoned".into())))
    }
}

impl ScriptControl {
    /// Next parked translate call
    pub async fn next_translation(&mut self) -> PendingTranslation {
        tokio::time::timeout(EVENT_TIMEOUT, self.translations.recv())
            .await
            .expect("timed out waiting for a translate call")
            .expect("scripted service dropped")
    }

    /// The next `count` parked translate calls
    pub async fn take_translations(&mut self, count: usize) -> Vec<PendingTranslation> {
        let mut pending = Vec::with_capacity(count);
        for _ in 0..count {
            pending.push(self.next_translation().await);
        }
        pending
    }

    /// A parked translate call, if one is already waiting
    pub fn try_next_translation(&mut self) -> Option<PendingTranslation> {
        self.translations.try_recv().ok()
    }

    /// Next parked fetch
    pub async fn next_fetch(&mut self) -> PendingFetch {
        tokio::time::timeout(EVENT_TIMEOUT, self.fetches.recv())
            .await
            .expect("timed out waiting for a fetch")
            .expect("scripted service dropped")
    }
}

// ----------------------------------------------------------------------------
// Events
// ----------------------------------------------------------------------------

/// Receive events until one matches `predicate`
pub async fn wait_for<F>(
    events: &mut broadcast::Receiver<WorkspaceEvent>,
    mut predicate: F,
) -> WorkspaceEvent
where
    F: FnMut(&WorkspaceEvent) -> bool,
{
    let matching = async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => panic!("workspace event channel closed"),
            }
        }
    };
    tokio::time::timeout(EVENT_TIMEOUT, matching)
        .await
        .expect("timed out waiting for workspace event")
}

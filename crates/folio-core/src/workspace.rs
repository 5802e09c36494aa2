//! Selective paragraph translation workspace
//!
//! Owns the loaded document, the active chapter context and the session
//! settings, and coordinates loads and translation batches against a
//! [`TranslationService`].
//!
//! # Consistency rules
//!
//! - Selecting a chapter (or loading a document) opens a new context: the
//!   selection, results and failures start empty.
//! - Each batch is tagged with the context epoch at dispatch; outcomes for an
//!   older epoch are dropped, never applied.
//! - The busy flag stays set until every batch in the current context has
//!   either resolved all its requests or been dropped by its caller.
//!
//! State lives behind a short-lived lock that is never held across an
//! `.await`, so loads, toggles, chapter switches and batch completions can
//! interleave freely on one task or several.

use crate::config::{SessionSettings, WorkspaceConfig};
use crate::context::{ChapterContext, Reconciled, TranslationMap};
use crate::document::{Document, DocumentId};
use crate::error::WorkspaceError;
use crate::events::WorkspaceEvent;
use crate::language::{Formality, LanguageCode, LanguagePair};
use crate::loader::{load_document, LoadState};
use crate::navigator::{BatchToken, ChapterNavigator, ChapterTarget, ContextEpoch};
use crate::orchestrator::{ParagraphJob, TranslationOrchestrator};
use crate::service::TranslationService;
use crate::view::{project_chapter, DocumentView, WorkspaceView};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Outcome of one `translate_selected` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Batch tag
    pub token: BatchToken,
    /// Paragraph indices requested
    pub requested: Vec<usize>,
    /// Indices whose translation was stored
    pub translated: Vec<usize>,
    /// Indices whose request failed
    pub failed: Vec<usize>,
    /// Outcomes dropped because the context changed
    pub stale: usize,
}

impl BatchReport {
    fn new(token: BatchToken, jobs: &[ParagraphJob]) -> Self {
        Self {
            token,
            requested: jobs.iter().map(|job| job.index).collect(),
            translated: Vec::new(),
            failed: Vec::new(),
            stale: 0,
        }
    }

    /// Some but not all requests succeeded
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.translated.is_empty() && !self.failed.is_empty()
    }

    /// The context changed before the batch finished
    #[inline]
    #[must_use]
    pub fn was_superseded(&self) -> bool {
        self.stale > 0
    }
}

#[derive(Debug)]
struct WorkspaceState {
    load: LoadState,
    load_sequence: u64,
    navigator: ChapterNavigator,
    context: ChapterContext,
    settings: SessionSettings,
}

impl WorkspaceState {
    fn chapter_len(&self) -> Option<usize> {
        let document = self.load.document()?;
        Some(document.chapter(self.navigator.active()).map_or(0, |c| c.len()))
    }
}

/// Holds one busy slot of the context that dispatched a batch
///
/// Released on drop, so a batch future dropped mid-flight (timeout, `select!`,
/// task abort) still clears its share of the busy flag.
struct BatchGuard {
    state: Arc<Mutex<WorkspaceState>>,
    token: BatchToken,
}

impl BatchGuard {
    fn new(state: &Arc<Mutex<WorkspaceState>>, token: BatchToken) -> Self {
        Self {
            state: Arc::clone(state),
            token,
        }
    }
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        self.state.lock().context.finish_batch(self.token);
    }
}

/// The translation workspace
#[derive(Debug)]
pub struct Workspace<S: ?Sized> {
    orchestrator: Arc<TranslationOrchestrator<S>>,
    service: Arc<S>,
    state: Arc<Mutex<WorkspaceState>>,
    events: broadcast::Sender<WorkspaceEvent>,
}

impl<S: ?Sized> Clone for Workspace<S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            service: Arc::clone(&self.service),
            state: Arc::clone(&self.state),
            events: self.events.clone(),
        }
    }
}

impl<S: TranslationService + ?Sized> Workspace<S> {
    /// Create a workspace over `service`
    #[must_use]
    pub fn new(service: Arc<S>, config: WorkspaceConfig) -> Self {
        let mut navigator = ChapterNavigator::new();
        let context = navigator.reset();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            orchestrator: Arc::new(TranslationOrchestrator::new(
                Arc::clone(&service),
                config.max_concurrent_translations,
            )),
            service,
            state: Arc::new(Mutex::new(WorkspaceState {
                load: LoadState::Empty,
                load_sequence: 0,
                navigator,
                context,
                settings: config.settings,
            })),
            events,
        }
    }

    /// Subscribe to change notifications
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: WorkspaceEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    // ----------------------------------------------------------------------
    // Document loading
    // ----------------------------------------------------------------------

    /// Load document `id`, replacing any current document
    ///
    /// The chapter context is reset when the load starts and again when it
    /// completes. If another load starts meanwhile, this result is discarded
    /// and only returned to the caller.
    ///
    /// # Errors
    /// `WorkspaceError::Load` if the fetch fails; the workspace is then in
    /// the failed state until the next load
    pub async fn load(&self, id: DocumentId) -> Result<Arc<Document>, WorkspaceError> {
        let sequence = {
            let mut state = self.state.lock();
            state.load_sequence += 1;
            state.load = LoadState::Loading { id };
            state.context = state.navigator.reset();
            state.load_sequence
        };
        self.emit(WorkspaceEvent::LoadStarted { id });

        let result = load_document(&*self.service, id).await;

        let mut state = self.state.lock();
        if state.load_sequence != sequence {
            tracing::debug!(document = %id, "load superseded by a newer request");
            return result.map(Arc::new).map_err(WorkspaceError::from);
        }

        match result {
            Ok(document) => {
                let document = Arc::new(document);
                state.load = LoadState::Ready(Arc::clone(&document));
                state.context = state.navigator.reset();
                drop(state);

                self.emit(WorkspaceEvent::DocumentLoaded {
                    id,
                    chapters: document.chapter_count(),
                });
                Ok(document)
            }
            Err(error) => {
                state.load = LoadState::Failed {
                    id,
                    error: error.clone(),
                };
                drop(state);

                self.emit(WorkspaceEvent::LoadFailed {
                    id,
                    message: error.detail().to_string(),
                });
                Err(WorkspaceError::Load(error))
            }
        }
    }

    /// Drop the current document and any chapter state
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            state.load_sequence += 1;
            state.load = LoadState::Empty;
            state.context = state.navigator.reset();
        }
        self.emit(WorkspaceEvent::DocumentClosed);
    }

    /// Current load state
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.state.lock().load.clone()
    }

    /// The loaded document, if ready
    #[must_use]
    pub fn document(&self) -> Option<Arc<Document>> {
        self.state.lock().load.document().cloned()
    }

    // ----------------------------------------------------------------------
    // Chapter navigation
    // ----------------------------------------------------------------------

    /// Make chapter `index` active
    ///
    /// Always succeeds: an index with no chapter (including any index of a
    /// document with no chapters) shows the empty placeholder. Selection,
    /// results and failures are reset either way.
    pub fn select_chapter(&self, index: usize) -> ChapterTarget {
        let (target, epoch) = {
            let mut state = self.state.lock();
            let count = state.load.document().map_or(0, |d| d.chapter_count());
            let (target, context) = state.navigator.activate(index, count);
            let epoch = context.epoch();
            state.context = context;
            (target, epoch)
        };

        if target.is_placeholder() {
            tracing::warn!(chapter = index, "no chapter at index, showing placeholder");
        } else {
            tracing::debug!(chapter = index, %epoch, "chapter selected");
        }
        self.emit(WorkspaceEvent::ChapterSelected {
            index,
            epoch,
            placeholder: target.is_placeholder(),
        });
        target
    }

    /// Active chapter index
    #[must_use]
    pub fn active_chapter(&self) -> usize {
        self.state.lock().navigator.active()
    }

    /// Current context epoch
    #[must_use]
    pub fn epoch(&self) -> ContextEpoch {
        self.state.lock().context.epoch()
    }

    // ----------------------------------------------------------------------
    // Selection
    // ----------------------------------------------------------------------

    /// Flip selection of paragraph `index` in the active chapter
    ///
    /// Returns whether the paragraph is now selected.
    ///
    /// # Errors
    /// - `WorkspaceError::NoDocument` when no document is ready
    /// - `WorkspaceError::ParagraphOutOfRange` when the active chapter has no
    ///   paragraph at `index`
    pub fn toggle_paragraph(&self, index: usize) -> Result<bool, WorkspaceError> {
        let selected = {
            let mut state = self.state.lock();
            let len = state.chapter_len().ok_or(WorkspaceError::NoDocument)?;
            if index >= len {
                return Err(WorkspaceError::ParagraphOutOfRange { index, len });
            }
            state.context.selection_mut().toggle(index)
        };

        tracing::debug!(paragraph = index, selected, "selection changed");
        self.emit(WorkspaceEvent::SelectionChanged { index, selected });
        Ok(selected)
    }

    /// Whether paragraph `index` is selected
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.state.lock().context.selection().is_selected(index)
    }

    /// Selected paragraph indices
    #[must_use]
    pub fn selected_indices(&self) -> BTreeSet<usize> {
        self.state.lock().context.selection().selected_indices().clone()
    }

    // ----------------------------------------------------------------------
    // Translation
    // ----------------------------------------------------------------------

    /// Translate every selected paragraph of the active chapter
    ///
    /// Returns `None` without touching the busy flag when there is nothing
    /// to translate. Otherwise resolves once every request has resolved;
    /// results are applied one by one as they arrive, and results that come
    /// back after a chapter switch are dropped.
    pub async fn translate_selected(&self) -> Option<BatchReport> {
        let (token, jobs, settings) = {
            let mut state = self.state.lock();
            let document = state.load.document().cloned()?;
            if state.context.selection().is_empty() {
                return None;
            }
            let chapter = document.chapter(state.navigator.active())?;
            let jobs = TranslationOrchestrator::<S>::plan(&chapter.paragraphs, state.context.selection());
            if jobs.is_empty() {
                return None;
            }
            let token = state.context.begin_batch();
            (token, jobs, state.settings.clone())
        };
        let guard = BatchGuard::new(&self.state, token);

        tracing::info!(
            batch = %token,
            paragraphs = jobs.len(),
            languages = %settings.languages,
            "translation batch dispatched"
        );
        self.emit(WorkspaceEvent::BatchStarted {
            token,
            paragraphs: jobs.len(),
        });

        let mut report = BatchReport::new(token, &jobs);
        self.orchestrator
            .run(jobs, &settings, |outcome| {
                let index = outcome.index;
                let reconciled = {
                    let mut state = self.state.lock();
                    match &outcome.result {
                        Ok(text) => state.context.reconcile(token, index, Ok(text.clone())),
                        Err(_) => state.context.reconcile(token, index, Err(())),
                    }
                };

                match reconciled {
                    Reconciled::Translated => {
                        report.translated.push(index);
                        self.emit(WorkspaceEvent::ParagraphTranslated { token, index });
                    }
                    Reconciled::Failed => {
                        if let Err(error) = &outcome.result {
                            tracing::warn!(batch = %token, paragraph = index, %error, "paragraph translation failed");
                        }
                        report.failed.push(index);
                        self.emit(WorkspaceEvent::ParagraphFailed { token, index });
                    }
                    Reconciled::Stale => {
                        tracing::debug!(batch = %token, paragraph = index, "dropping result for previous chapter context");
                        report.stale += 1;
                        self.emit(WorkspaceEvent::StaleResultDropped { token, index });
                    }
                }
            })
            .await;

        drop(guard);

        tracing::info!(
            batch = %token,
            translated = report.translated.len(),
            failed = report.failed.len(),
            stale = report.stale,
            "translation batch finished"
        );
        self.emit(WorkspaceEvent::BatchFinished {
            token,
            translated: report.translated.len(),
            failed: report.failed.len(),
            stale: report.stale,
        });
        Some(report)
    }

    /// Whether a batch of the current context is running
    #[must_use]
    pub fn is_translating(&self) -> bool {
        self.state.lock().context.is_translating()
    }

    /// Translations of the active chapter
    #[must_use]
    pub fn translations(&self) -> TranslationMap {
        self.state.lock().context.translations().clone()
    }

    /// Translation of paragraph `index`, if received
    #[must_use]
    pub fn translation(&self, index: usize) -> Option<String> {
        self.state.lock().context.translations().get(&index).cloned()
    }

    /// Paragraphs of the active chapter whose translation failed
    #[must_use]
    pub fn failed_indices(&self) -> BTreeSet<usize> {
        self.state.lock().context.failed().clone()
    }

    // ----------------------------------------------------------------------
    // Session settings
    // ----------------------------------------------------------------------

    /// Current session settings
    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.state.lock().settings.clone()
    }

    fn update_settings(&self, update: impl FnOnce(&mut SessionSettings)) {
        update(&mut self.state.lock().settings);
        self.emit(WorkspaceEvent::SettingsChanged);
    }

    /// Replace the language pair
    pub fn set_languages(&self, languages: LanguagePair) {
        self.update_settings(|settings| settings.languages = languages);
    }

    /// Replace the source language
    pub fn set_source_language(&self, source: LanguageCode) {
        self.update_settings(|settings| settings.languages.source = source);
    }

    /// Replace the target language
    pub fn set_target_language(&self, target: LanguageCode) {
        self.update_settings(|settings| settings.languages.target = target);
    }

    /// Exchange source and target languages
    pub fn swap_languages(&self) {
        self.update_settings(|settings| {
            let languages = std::mem::take(&mut settings.languages);
            settings.languages = languages.swapped();
        });
    }

    /// Replace the formality level
    pub fn set_formality(&self, formality: Formality) {
        self.update_settings(|settings| settings.formality = formality);
    }

    /// Replace the style hint; `None` or blank means general
    pub fn set_style(&self, style: Option<String>) {
        self.update_settings(|settings| {
            settings.style = style.filter(|s| !s.trim().is_empty());
        });
    }

    // ----------------------------------------------------------------------
    // Projection
    // ----------------------------------------------------------------------

    /// Render-ready snapshot of the whole workspace
    #[must_use]
    pub fn view(&self) -> WorkspaceView {
        let state = self.state.lock();
        match &state.load {
            LoadState::Empty => WorkspaceView::NoDocument,
            LoadState::Loading { id } => WorkspaceView::Loading { id: *id },
            LoadState::Failed { id, error } => WorkspaceView::Failed {
                id: *id,
                message: error.detail().to_string(),
            },
            LoadState::Ready(document) => {
                let context = &state.context;
                let chapter = project_chapter(
                    document,
                    state.navigator.active(),
                    context.selection(),
                    context.translations(),
                )
                .with_failures(context.failed());

                WorkspaceView::Ready(Box::new(DocumentView {
                    id: document.id,
                    filename: document.filename.clone(),
                    metadata: document.metadata.clone(),
                    chapter_titles: document.chapter_titles(),
                    chapter,
                    selected_count: context.selection().len(),
                    translating: context.is_translating(),
                    settings: state.settings.clone(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chapter;
    use crate::error::ServiceError;
    use crate::service::{MockTranslationService, TranslationResponse};

    fn two_chapters() -> Document {
        Document::new(
            DocumentId::new(42).unwrap(),
            "two.txt",
            vec![
                Chapter::new(Some("One".into()), vec!["Hello".into(), "World".into()]),
                Chapter::new(Some("Two".into()), vec!["Again".into()]),
            ],
        )
    }

    fn workspace_with(service: MockTranslationService) -> Workspace<MockTranslationService> {
        Workspace::new(Arc::new(service), WorkspaceConfig::default())
    }

    fn ready_service() -> MockTranslationService {
        let mut service = MockTranslationService::new();
        service.expect_fetch_document().returning(|_| Ok(two_chapters()));
        service
    }

    #[tokio::test]
    async fn starts_without_document() {
        let ws = workspace_with(MockTranslationService::new());
        assert_eq!(ws.view(), WorkspaceView::NoDocument);
        assert_eq!(ws.toggle_paragraph(0), Err(WorkspaceError::NoDocument));
        assert!(ws.translate_selected().await.is_none());
    }

    #[tokio::test]
    async fn load_failure_is_error_state() {
        let mut service = MockTranslationService::new();
        service.expect_fetch_document().returning(|_| {
            Err(ServiceError::Status {
                status: 500,
                detail: "database offline".into(),
            })
        });
        let ws = workspace_with(service);

        let result = ws.load(DocumentId::new(42).unwrap()).await;
        assert!(matches!(result, Err(WorkspaceError::Load(_))));

        let state = ws.load_state();
        assert!(state.is_failed());
        assert!(!state.is_loading());
        assert!(!state.is_ready());
        assert!(ws.view().chapter().is_none());
        assert!(matches!(ws.view(), WorkspaceView::Failed { message, .. } if message == "database offline"));
    }

    #[tokio::test]
    async fn toggle_validates_against_active_chapter() {
        let ws = workspace_with(ready_service());
        ws.load(DocumentId::new(42).unwrap()).await.unwrap();

        assert_eq!(ws.toggle_paragraph(1), Ok(true));
        assert_eq!(
            ws.toggle_paragraph(2),
            Err(WorkspaceError::ParagraphOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(ws.toggle_paragraph(1), Ok(false));
        assert!(ws.selected_indices().is_empty());
    }

    #[tokio::test]
    async fn chapter_switch_resets_selection_and_results() {
        let mut service = ready_service();
        service
            .expect_translate()
            .returning(|_| Ok(TranslationResponse::new("Olá")));
        let ws = workspace_with(service);
        ws.load(DocumentId::new(42).unwrap()).await.unwrap();

        ws.toggle_paragraph(0).unwrap();
        ws.translate_selected().await.unwrap();
        assert_eq!(ws.translations().len(), 1);

        let target = ws.select_chapter(1);
        assert_eq!(target, ChapterTarget::Chapter(1));
        assert!(ws.selected_indices().is_empty());
        assert!(ws.translations().is_empty());
        assert!(ws.failed_indices().is_empty());
    }

    #[tokio::test]
    async fn settings_change_keeps_results() {
        let mut service = ready_service();
        service
            .expect_translate()
            .returning(|_| Ok(TranslationResponse::new("Olá")));
        let ws = workspace_with(service);
        ws.load(DocumentId::new(42).unwrap()).await.unwrap();
        ws.toggle_paragraph(0).unwrap();
        ws.translate_selected().await.unwrap();

        ws.swap_languages();
        ws.set_formality(Formality::Formal);
        ws.set_style(Some("   ".into()));

        let settings = ws.settings();
        assert_eq!(settings.languages.source.as_str(), "pt");
        assert_eq!(settings.languages.target.as_str(), "en");
        assert_eq!(settings.style, None);
        assert!(ws.is_selected(0));
        assert_eq!(ws.translation(0).as_deref(), Some("Olá"));
    }

    #[tokio::test]
    async fn close_returns_to_no_document() {
        let ws = workspace_with(ready_service());
        ws.load(DocumentId::new(42).unwrap()).await.unwrap();
        ws.close();
        assert_eq!(ws.view(), WorkspaceView::NoDocument);
        assert!(ws.document().is_none());
    }

    #[tokio::test]
    async fn events_follow_state_changes() {
        let ws = workspace_with(ready_service());
        let mut events = ws.subscribe();

        ws.load(DocumentId::new(42).unwrap()).await.unwrap();
        ws.select_chapter(1);

        let id = DocumentId::new(42).unwrap();
        assert_eq!(events.recv().await.unwrap(), WorkspaceEvent::LoadStarted { id });
        assert_eq!(
            events.recv().await.unwrap(),
            WorkspaceEvent::DocumentLoaded { id, chapters: 2 }
        );
        assert!(matches!(
            events.recv().await.unwrap(),
            WorkspaceEvent::ChapterSelected { index: 1, placeholder: false, .. }
        ));
    }
}

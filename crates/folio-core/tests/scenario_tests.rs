//! End-to-end workspace scenarios.

use folio_core::{
    DocumentId, ServiceError, Workspace, WorkspaceConfig, WorkspaceError, WorkspaceView,
};
use folio_test_utils::{doc_id, sample_document, ScriptedService, StaticService};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn partial_failure_keeps_successful_paragraph() {
    let service = StaticService::new()
        .with_document(sample_document())
        .with_translation("Hello", "Olá")
        .failing_on("World");
    let service = Arc::new(service);
    let ws = Workspace::new(Arc::clone(&service), WorkspaceConfig::new());

    ws.load(doc_id(42)).await.unwrap();
    ws.select_chapter(0);
    ws.toggle_paragraph(0).unwrap();
    ws.toggle_paragraph(1).unwrap();

    let report = ws.translate_selected().await.unwrap();

    assert_eq!(service.translate_calls(), 2);
    assert_eq!(report.requested, vec![0, 1]);
    assert_eq!(report.translated, vec![0]);
    assert_eq!(report.failed, vec![1]);

    let translations = ws.translations();
    assert_eq!(translations.len(), 1);
    assert_eq!(translations.get(&0).map(String::as_str), Some("Olá"));
    assert!(!translations.contains_key(&1));
    assert!(!ws.is_translating());
}

#[tokio::test]
async fn failed_load_renders_nothing() {
    let (service, _control) = ScriptedService::new();
    service.insert_failure(
        doc_id(42),
        ServiceError::Status {
            status: 500,
            detail: "Erro ao buscar documento".into(),
        },
    );
    let ws = Workspace::new(service, WorkspaceConfig::new());

    let error = ws.load(doc_id(42)).await.unwrap_err();
    assert!(matches!(error, WorkspaceError::Load(ServiceError::Status { status: 500, .. })));

    let state = ws.load_state();
    assert!(state.is_failed());
    assert!(!state.is_loading());
    assert!(!state.is_ready());
    assert!(state.document().is_none());

    assert_eq!(
        ws.view(),
        WorkspaceView::Failed {
            id: doc_id(42),
            message: "Erro ao buscar documento".into(),
        }
    );
    assert!(ws.view().chapter().is_none());
}

#[tokio::test]
async fn missing_document_is_error_not_loading() {
    let ws = Workspace::new(Arc::new(StaticService::new()), WorkspaceConfig::new());

    let error = ws.load(doc_id(7)).await.unwrap_err();
    assert!(matches!(error, WorkspaceError::Load(ServiceError::NotFound(_))));
    assert!(!error.is_retryable());
    assert!(ws.load_state().is_failed());
}

#[tokio::test]
async fn retry_after_failure_is_manual() {
    let (service, _control) = ScriptedService::new();
    service.insert_failure(doc_id(42), ServiceError::Transport("connection refused".into()));
    let ws = Workspace::new(Arc::clone(&service), WorkspaceConfig::new());

    let error = ws.load(doc_id(42)).await.unwrap_err();
    assert!(error.is_retryable());
    assert!(ws.load_state().is_failed());

    service.insert_document(sample_document());
    ws.load(doc_id(42)).await.unwrap();
    assert!(ws.load_state().is_ready());
}

#[tokio::test]
async fn ready_view_reflects_selection_and_translation() {
    let service = StaticService::new()
        .with_document(sample_document())
        .with_translation("World", "Mundo");
    let ws = Workspace::new(Arc::new(service), WorkspaceConfig::new());
    ws.load(doc_id(42)).await.unwrap();

    ws.toggle_paragraph(1).unwrap();
    ws.translate_selected().await.unwrap();

    let WorkspaceView::Ready(view) = ws.view() else {
        panic!("expected ready view");
    };
    assert_eq!(view.filename, "sample.pdf");
    assert_eq!(view.metadata.author.as_deref(), Some("Ada"));
    assert_eq!(view.chapter_titles, vec!["Greetings".to_string(), "Chapter 2".to_string()]);
    assert_eq!(view.selected_count, 1);
    assert!(view.can_translate());

    let paragraphs = &view.chapter.paragraphs;
    assert_eq!(paragraphs.len(), 2);
    assert!(!paragraphs[0].selected);
    assert_eq!(paragraphs[0].translation, None);
    assert!(paragraphs[1].selected);
    assert_eq!(paragraphs[1].translation.as_deref(), Some("Mundo"));
}

#[test]
fn document_ids_must_be_positive() {
    assert!(DocumentId::new(0).is_err());
    assert!("0".parse::<DocumentId>().is_err());
}

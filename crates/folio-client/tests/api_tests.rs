//! `ApiClient` against a local canned-response listener.
//!
//! Each test binds an ephemeral port, answers a fixed list of responses in
//! order and records what the client sent.

use folio_client::{ApiClient, ClientConfig, ClientError, UploadCandidate, UploadState, UploadTracker};
use folio_core::{
    DocumentId, LanguagePair, ServiceError, TranslationRequest, TranslationService, Workspace,
    WorkspaceConfig,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Request line, headers and body as received
#[derive(Debug)]
struct Recorded {
    head: String,
    body: Vec<u8>,
}

impl Recorded {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

async fn serve(responses: Vec<(u16, &'static str)>) -> (ClientConfig, mpsc::UnboundedReceiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let recorded = read_request(&mut socket).await;
            let _ = tx.send(recorded);

            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    let config = ClientConfig::new().with_base_url(format!("http://{address}"));
    (config, rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Recorded {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = socket.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before headers");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(position) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break position + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let chunked = head.to_ascii_lowercase().contains("transfer-encoding: chunked");

    loop {
        let complete = if chunked {
            buffer.ends_with(b"0\r\n\r\n")
        } else {
            buffer.len() >= header_end + length
        };
        if complete {
            break;
        }
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let raw = &buffer[header_end..];
    let body = if chunked { dechunk(raw) } else { raw.to_vec() };
    Recorded { head, body }
}

fn dechunk(mut raw: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    while let Some(line_end) = raw.windows(2).position(|w| w == b"\r\n") {
        let size_line = String::from_utf8_lossy(&raw[..line_end]);
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        body.extend_from_slice(&raw[start..start + size]);
        raw = &raw[start + size + 2..];
    }
    body
}

const DOCUMENT: &str = r#"{
    "id": 42,
    "filename": "sample.pdf",
    "document_metadata": {"author": "Ada", "title": null},
    "chapters": [
        {"title": "Greetings", "paragraphs": ["Hello", "World"]},
        {"title": null, "paragraphs": null}
    ]
}"#;

#[tokio::test]
async fn fetches_and_decodes_document() {
    let (config, mut requests) = serve(vec![(200, DOCUMENT)]).await;
    let client = ApiClient::new(config).unwrap();

    let document = client.fetch_document(DocumentId::new(42).unwrap()).await.unwrap();
    assert_eq!(document.filename, "sample.pdf");
    assert_eq!(document.chapter_count(), 2);
    assert_eq!(document.metadata.author.as_deref(), Some("Ada"));
    assert!(document.chapters[1].is_empty());

    let request = requests.recv().await.unwrap();
    assert_eq!(request.request_line(), "GET /api/documents/42 HTTP/1.1");
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let (config, _requests) = serve(vec![(404, r#"{"detail": "Documento não encontrado"}"#)]).await;
    let client = ApiClient::new(config).unwrap();

    let error = client.fetch_document(DocumentId::new(9).unwrap()).await.unwrap_err();
    assert_eq!(error, ServiceError::NotFound("Documento não encontrado".into()));
}

#[tokio::test]
async fn quick_translation_posts_languages_and_formality() {
    let (config, mut requests) = serve(vec![(
        200,
        r#"{"translated_text": "Olá", "source_language": "en", "target_language": "pt"}"#,
    )])
    .await;
    let client = ApiClient::new(config).unwrap();

    let request = TranslationRequest::new("Hello", &LanguagePair::default())
        .with_formality(folio_core::Formality::Neutral)
        .with_style(Some("academic".into()));
    let response = client.translate(request).await.unwrap();
    assert_eq!(response.translated_text, "Olá");

    let recorded = requests.recv().await.unwrap();
    assert_eq!(recorded.request_line(), "POST /api/translations/quick HTTP/1.1");
    let body: serde_json::Value = serde_json::from_slice(&recorded.body).unwrap();
    assert_eq!(body["text"], "Hello");
    assert_eq!(body["source_language"], "en");
    assert_eq!(body["target_language"], "pt");
    assert_eq!(body["formality_level"], "neutral");
    assert_eq!(body["style"], "academic");
    assert_eq!(body["tone"], "academic");
}

#[tokio::test]
async fn translation_failure_keeps_detail() {
    let (config, _requests) = serve(vec![(500, r#"{"detail": "Erro ao traduzir texto: quota"}"#)]).await;
    let client = ApiClient::new(config).unwrap();

    let error = client
        .translate(TranslationRequest::new("Hello", &LanguagePair::default()))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        ServiceError::Status {
            status: 500,
            detail: "Erro ao traduzir texto: quota".into()
        }
    );
    assert!(error.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (config, _requests) = serve(vec![(200, r#"{"chapters": "nope"}"#)]).await;
    let client = ApiClient::new(config).unwrap();

    let error = client.get_document(DocumentId::new(1).unwrap()).await.unwrap_err();
    assert!(matches!(error, ClientError::Decode(_)));
}

#[tokio::test]
async fn lists_history_and_rates() {
    let (config, mut requests) = serve(vec![
        (
            200,
            r#"[{"id": 3, "filename": "a.txt", "size": 1536, "num_chapters": 1, "total_paragraphs": 4, "created_at": "2024-05-01T08:00:00"}]"#,
        ),
        (200, r#"[{"id": 11, "translated_text": "Olá", "source_language": "en", "target_language": "pt"}]"#),
        (200, r#"{"id": 11}"#),
        (200, r#"{"message": "deleted"}"#),
    ])
    .await;
    let client = ApiClient::new(config).unwrap();

    let documents = client.list_documents().await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].size_label(), "1.5 KB");
    assert_eq!(requests.recv().await.unwrap().request_line(), "GET /api/documents HTTP/1.1");

    let history = client.translations_history().await.unwrap();
    assert_eq!(history[0].id, Some(11));
    assert_eq!(requests.recv().await.unwrap().request_line(), "GET /api/translations HTTP/1.1");

    client.rate_translation(11, 4).await.unwrap();
    let rating = requests.recv().await.unwrap();
    assert_eq!(rating.request_line(), "PUT /api/translations/11 HTTP/1.1");
    assert_eq!(rating.body_text(), r#"{"quality_rating":4}"#);

    client.delete_document(DocumentId::new(3).unwrap()).await.unwrap();
    assert_eq!(requests.recv().await.unwrap().request_line(), "DELETE /api/documents/3 HTTP/1.1");
}

#[tokio::test]
async fn upload_streams_multipart_and_tracks_progress() {
    let (config, mut requests) = serve(vec![(
        200,
        r#"{"id": 8, "filename": "notes.txt", "size": 10, "num_chapters": 1, "total_paragraphs": 2, "created_at": "2024-05-01T08:00:00"}"#,
    )])
    .await;
    let mut config = config;
    config.upload.chunk_size = 4;
    let client = ApiClient::new(config).unwrap();
    let tracker = UploadTracker::new();

    let summary = client
        .upload(Some(UploadCandidate::new("notes.txt", b"first\nlast".to_vec())), &tracker)
        .await
        .unwrap();
    assert_eq!(summary.id.get(), 8);
    assert_eq!(tracker.state(), UploadState::Succeeded(summary));

    let recorded = requests.recv().await.unwrap();
    assert_eq!(recorded.request_line(), "POST /api/documents/upload HTTP/1.1");
    assert!(recorded.head.to_ascii_lowercase().contains("multipart/form-data"));
    let body = recorded.body_text();
    assert!(body.contains(r#"name="file"; filename="notes.txt""#));
    assert!(body.to_ascii_lowercase().contains("content-type: text/plain"));
    assert!(body.contains("first\nlast"));
}

#[tokio::test]
async fn rejected_upload_surfaces_server_detail() {
    let (config, _requests) = serve(vec![(
        500,
        r#"{"detail": "Erro ao processar o arquivo: PDF corrompido"}"#,
    )])
    .await;
    let client = ApiClient::new(config).unwrap();
    let tracker = UploadTracker::new();

    let error = client
        .upload(Some(UploadCandidate::new("broken.pdf", vec![0u8; 32])), &tracker)
        .await
        .unwrap_err();
    assert_eq!(error.message(), "Erro ao processar o arquivo: PDF corrompido");
    assert_eq!(
        tracker.state(),
        UploadState::Failed("Erro ao processar o arquivo: PDF corrompido".into())
    );
}

#[tokio::test]
async fn workspace_runs_on_http_client() {
    let (config, _requests) = serve(vec![
        (200, DOCUMENT),
        (200, r#"{"translated_text": "Mundo"}"#),
    ])
    .await;
    let client = Arc::new(ApiClient::new(config).unwrap());
    let workspace = Workspace::new(client, WorkspaceConfig::new().with_max_concurrent(1));

    workspace.load(DocumentId::new(42).unwrap()).await.unwrap();
    workspace.toggle_paragraph(1).unwrap();
    let report = workspace.translate_selected().await.unwrap();

    assert_eq!(report.translated, vec![1]);
    assert_eq!(workspace.translation(1).as_deref(), Some("Mundo"));
}

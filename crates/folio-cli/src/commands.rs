//! Subcommand handlers

use crate::render;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use folio_client::{ApiClient, UploadCandidate, UploadState, UploadTracker};
use folio_core::{
    DocumentId, Formality, LanguageCode, Workspace, WorkspaceConfig, WorkspaceView,
};
use std::path::PathBuf;
use std::sync::Arc;

fn document_id(args: &ArgMatches) -> Result<DocumentId> {
    let raw = args.get_one::<u64>("id").copied().context("missing document id")?;
    Ok(DocumentId::new(raw)?)
}

fn chapter_index(args: &ArgMatches) -> usize {
    args.get_one::<usize>("chapter").copied().unwrap_or(0)
}

pub(crate) fn languages() {
    print!("{}", render::languages());
}

pub(crate) async fn list(client: &ApiClient) -> Result<()> {
    let documents = client.list_documents().await.context("cannot list documents")?;
    print!("{}", render::documents(&documents));
    Ok(())
}

/// Load a document into a fresh workspace and activate `chapter`
async fn open(
    client: Arc<ApiClient>,
    config: WorkspaceConfig,
    id: DocumentId,
    chapter: usize,
) -> Result<Workspace<ApiClient>> {
    let workspace = Workspace::new(client, config);
    workspace
        .load(id)
        .await
        .with_context(|| format!("cannot load document {id}"))?;

    if workspace.select_chapter(chapter).is_placeholder() {
        eprintln!("document {id} has no chapter {chapter}");
    }
    Ok(workspace)
}

fn print_view(workspace: &Workspace<ApiClient>) -> Result<()> {
    match workspace.view() {
        WorkspaceView::Ready(view) => {
            print!("{}", render::document(&view));
            Ok(())
        }
        WorkspaceView::Failed { id, message } => bail!("document {id} failed to load: {message}"),
        WorkspaceView::Loading { id } => bail!("document {id} is still loading"),
        WorkspaceView::NoDocument => bail!("no document loaded"),
    }
}

pub(crate) async fn show(client: Arc<ApiClient>, config: WorkspaceConfig, args: &ArgMatches) -> Result<()> {
    let workspace = open(client, config, document_id(args)?, chapter_index(args)).await?;
    print_view(&workspace)
}

pub(crate) async fn translate(
    client: Arc<ApiClient>,
    config: WorkspaceConfig,
    args: &ArgMatches,
) -> Result<()> {
    let workspace = open(client, config, document_id(args)?, chapter_index(args)).await?;

    if let Some(from) = args.get_one::<String>("from") {
        workspace.set_source_language(from.parse::<LanguageCode>()?);
    }
    if let Some(to) = args.get_one::<String>("to") {
        workspace.set_target_language(to.parse::<LanguageCode>()?);
    }
    if let Some(formality) = args.get_one::<String>("formality") {
        workspace.set_formality(formality.parse::<Formality>()?);
    }
    if let Some(style) = args.get_one::<String>("style") {
        workspace.set_style(Some(style.clone()));
    }

    let paragraphs = args.get_many::<usize>("paragraphs").context("no paragraphs given")?;
    for index in paragraphs.copied() {
        // Repeated indices select once
        if !workspace.is_selected(index) {
            workspace.toggle_paragraph(index)?;
        }
    }

    let Some(report) = workspace.translate_selected().await else {
        bail!("nothing to translate");
    };

    print_view(&workspace)?;
    println!();
    println!("{}", render::batch_summary(&report));
    if report.failed.len() == report.requested.len() {
        bail!("every translation request failed");
    }
    Ok(())
}

pub(crate) async fn upload(client: &ApiClient, args: &ArgMatches) -> Result<()> {
    let path = args.get_one::<PathBuf>("path").context("missing path")?;
    let candidate = UploadCandidate::from_path(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;

    let tracker = UploadTracker::new();
    let mut watcher = tracker.subscribe();
    let progress = tokio::spawn(async move {
        let mut last = None;
        while watcher.changed().await.is_ok() {
            let percent = match &*watcher.borrow_and_update() {
                UploadState::Uploading(progress) => progress.percent(),
                UploadState::Succeeded(_) | UploadState::Failed(_) => break,
                _ => continue,
            };
            if last != Some(percent) {
                eprint!("\ruploading... {percent:>3}%");
                last = Some(percent);
            }
        }
        if last.is_some() {
            eprintln!();
        }
    });

    let result = client.upload(Some(candidate), &tracker).await;
    let _ = progress.await;

    match result {
        Ok(summary) => {
            println!(
                "uploaded {} as document {} ({}, {} chapters, {} paragraphs)",
                summary.filename,
                summary.id,
                summary.size_label(),
                summary.num_chapters,
                summary.total_paragraphs
            );
            Ok(())
        }
        Err(error) => bail!("{}", error.message()),
    }
}

pub(crate) async fn delete(client: &ApiClient, args: &ArgMatches) -> Result<()> {
    let id = document_id(args)?;
    client
        .delete_document(id)
        .await
        .with_context(|| format!("cannot delete document {id}"))?;
    println!("deleted document {id}");
    Ok(())
}

pub(crate) async fn history(client: &ApiClient) -> Result<()> {
    let records = client
        .translations_history()
        .await
        .context("cannot fetch translation history")?;
    print!("{}", render::history(&records));
    Ok(())
}

pub(crate) async fn rate(client: &ApiClient, args: &ArgMatches) -> Result<()> {
    let id = args.get_one::<u64>("translation").copied().context("missing translation id")?;
    let rating = args.get_one::<u8>("rating").copied().context("missing rating")?;
    client
        .rate_translation(id, rating)
        .await
        .with_context(|| format!("cannot rate translation {id}"))?;
    println!("rated translation {id}: {rating}/5");
    Ok(())
}

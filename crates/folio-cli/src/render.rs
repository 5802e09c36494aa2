//! Plain-text rendering of views and listings

use folio_client::{DocumentSummary, TranslationRecord};
use folio_core::{BatchReport, ChapterView, DocumentView, SUPPORTED_LANGUAGES};
use std::fmt::Write;

pub(crate) fn languages() -> String {
    let mut out = String::new();
    for (code, name) in SUPPORTED_LANGUAGES {
        let _ = writeln!(out, "{code:<4}{name}");
    }
    out
}

pub(crate) fn documents(documents: &[DocumentSummary]) -> String {
    if documents.is_empty() {
        return "No documents uploaded yet.\n".to_string();
    }

    let mut out = format!(
        "{:>5}  {:<32}  {:>10}  {:>8}  {:>10}  {}\n",
        "ID", "FILENAME", "SIZE", "CHAPTERS", "PARAGRAPHS", "CREATED"
    );
    for doc in documents {
        let _ = writeln!(
            out,
            "{:>5}  {:<32}  {:>10}  {:>8}  {:>10}  {}",
            doc.id,
            doc.filename,
            doc.size_label(),
            doc.num_chapters,
            doc.total_paragraphs,
            doc.created_label()
        );
    }
    out
}

pub(crate) fn document(view: &DocumentView) -> String {
    let mut out = format!("{} (#{})\n", view.filename, view.id);

    let meta = &view.metadata;
    if let Some(title) = &meta.title {
        let _ = writeln!(out, "  title:  {title}");
    }
    if let Some(author) = &meta.author {
        let _ = writeln!(out, "  author: {author}");
    }
    if let Some(pages) = meta.num_pages {
        let _ = writeln!(out, "  pages:  {pages}");
    }
    let _ = writeln!(
        out,
        "  languages: {} ({})",
        view.settings.languages, view.settings.formality
    );

    out.push_str("\nChapters:\n");
    for (index, title) in view.chapter_titles.iter().enumerate() {
        let marker = if index == view.chapter.index { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {index:>3}  {title}");
    }

    out.push('\n');
    out.push_str(&chapter(&view.chapter));
    out
}

pub(crate) fn chapter(view: &ChapterView) -> String {
    let mut out = format!("== {} ==\n", view.title);
    if view.paragraphs.is_empty() {
        out.push_str("(no paragraphs)\n");
        return out;
    }

    for paragraph in &view.paragraphs {
        let mark = if paragraph.selected { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {:>3}  {}", paragraph.index, paragraph.text);
        if let Some(translation) = &paragraph.translation {
            let _ = writeln!(out, "         -> {translation}");
        } else if paragraph.failed {
            out.push_str("         !! translation failed\n");
        }
    }
    out
}

pub(crate) fn history(records: &[TranslationRecord]) -> String {
    if records.is_empty() {
        return "No translations yet.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let id = record.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let rating = record
            .quality_rating
            .map_or_else(String::new, |r| format!("  rated {r}/5"));
        let _ = writeln!(
            out,
            "#{id}  {} -> {}{rating}",
            record.source_language, record.target_language
        );
        if let Some(original) = &record.original_text {
            let _ = writeln!(out, "    {original}");
        }
        let _ = writeln!(out, "    {}", record.translated_text);
    }
    out
}

pub(crate) fn batch_summary(report: &BatchReport) -> String {
    let mut out = format!(
        "translated {} of {} paragraphs",
        report.translated.len(),
        report.requested.len()
    );
    if !report.failed.is_empty() {
        let failed: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
        let _ = write!(out, ", failed: {}", failed.join(","));
    }
    if report.was_superseded() {
        let _ = write!(out, ", {} dropped after chapter change", report.stale);
    }
    out
}

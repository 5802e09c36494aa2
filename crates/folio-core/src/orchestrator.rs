//! Translation orchestrator
//!
//! Fans a selection out into one translation request per paragraph and hands
//! each outcome to the caller as soon as it resolves:
//! - Requests run concurrently, bounded by `max_concurrent`
//! - Outcomes arrive in completion order, not selection order
//! - A failed request never stops the remaining ones
//! - No retries; a missing result is the failure signal

use crate::config::SessionSettings;
use crate::error::ServiceError;
use crate::selection::Selection;
use crate::service::{TranslationRequest, TranslationService};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// One paragraph to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphJob {
    /// Position in the chapter
    pub index: usize,
    /// Paragraph text
    pub text: String,
}

/// Resolution of one paragraph request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphOutcome {
    /// Position in the chapter
    pub index: usize,
    /// Translated text or the service failure
    pub result: Result<String, ServiceError>,
}

/// Counts of a finished fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutSummary {
    /// Requests issued
    pub requested: usize,
    /// Requests that succeeded
    pub succeeded: usize,
    /// Requests that failed
    pub failed: usize,
}

/// Issues per-paragraph translation requests
#[derive(Debug)]
pub struct TranslationOrchestrator<S: ?Sized> {
    service: Arc<S>,
    max_concurrent: usize,
}

impl<S: TranslationService + ?Sized> TranslationOrchestrator<S> {
    /// Create an orchestrator over `service`
    #[inline]
    #[must_use]
    pub fn new(service: Arc<S>, max_concurrent: usize) -> Self {
        Self {
            service,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Concurrency bound
    #[inline]
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Pair each selected index with its paragraph text
    ///
    /// Indices with no paragraph are skipped.
    #[must_use]
    pub fn plan(paragraphs: &[String], selection: &Selection) -> Vec<ParagraphJob> {
        selection
            .iter()
            .filter_map(|index| match paragraphs.get(index) {
                Some(text) => Some(ParagraphJob {
                    index,
                    text: text.clone(),
                }),
                None => {
                    tracing::debug!(paragraph = index, "selected index has no paragraph, skipping");
                    None
                }
            })
            .collect()
    }

    /// Translate every job, calling `on_outcome` as each request resolves
    ///
    /// Returns once every request has resolved, successfully or not.
    pub async fn run<F>(
        &self,
        jobs: Vec<ParagraphJob>,
        settings: &SessionSettings,
        mut on_outcome: F,
    ) -> FanOutSummary
    where
        F: FnMut(ParagraphOutcome) + Send,
    {
        let mut summary = FanOutSummary {
            requested: jobs.len(),
            ..FanOutSummary::default()
        };

        let requests: Vec<(usize, TranslationRequest)> = jobs
            .into_iter()
            .map(|job| (job.index, TranslationRequest::from_settings(job.text, settings)))
            .collect();

        let mut outcomes = stream::iter(requests)
            .map(|(index, request)| {
                let service = Arc::clone(&self.service);
                async move {
                    let result = service
                        .translate(request)
                        .await
                        .map(|response| response.translated_text);
                    ParagraphOutcome { index, result }
                }
            })
            .buffer_unordered(self.max_concurrent);

        while let Some(outcome) = outcomes.next().await {
            if outcome.result.is_ok() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            on_outcome(outcome);
        }

        summary
    }

    /// Translate the selected paragraphs of one chapter
    ///
    /// An empty selection is a no-op and returns `None`.
    pub async fn translate_selected<F>(
        &self,
        paragraphs: &[String],
        selection: &Selection,
        settings: &SessionSettings,
        on_outcome: F,
    ) -> Option<FanOutSummary>
    where
        F: FnMut(ParagraphOutcome) + Send,
    {
        if selection.is_empty() {
            return None;
        }
        let jobs = Self::plan(paragraphs, selection);
        Some(self.run(jobs, settings, on_outcome).await)
    }
}

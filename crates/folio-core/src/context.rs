//! Per-chapter mutable state
//!
//! A [`ChapterContext`] lives from one chapter activation to the next. It owns
//! the selection, the translation results, the failed-index set and the count
//! of outstanding batches. Results tagged with another epoch are rejected.

use crate::navigator::{BatchToken, ContextEpoch};
use crate::selection::Selection;
use std::collections::{BTreeMap, BTreeSet};

/// Translated text keyed by paragraph index within the active chapter
pub type TranslationMap = BTreeMap<usize, String>;

/// How a single paragraph outcome was reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Translation stored
    Translated,
    /// Failure recorded; the paragraph stays untranslated
    Failed,
    /// Outcome belonged to a previous context and was dropped
    Stale,
}

/// Selection and results for one chapter activation
#[derive(Debug, Clone)]
pub struct ChapterContext {
    chapter: usize,
    epoch: ContextEpoch,
    selection: Selection,
    translations: TranslationMap,
    failed: BTreeSet<usize>,
    outstanding: usize,
    next_sequence: u64,
}

impl ChapterContext {
    pub(crate) fn new(chapter: usize, epoch: ContextEpoch) -> Self {
        Self {
            chapter,
            epoch,
            selection: Selection::new(),
            translations: TranslationMap::new(),
            failed: BTreeSet::new(),
            outstanding: 0,
            next_sequence: 0,
        }
    }

    /// Chapter this context belongs to
    #[inline]
    #[must_use]
    pub fn chapter(&self) -> usize {
        self.chapter
    }

    /// Epoch of this context
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> ContextEpoch {
        self.epoch
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Translations received so far
    #[inline]
    #[must_use]
    pub fn translations(&self) -> &TranslationMap {
        &self.translations
    }

    /// Paragraphs whose latest request failed and that have no translation
    #[inline]
    #[must_use]
    pub fn failed(&self) -> &BTreeSet<usize> {
        &self.failed
    }

    /// Whether any batch of this context is still running
    #[inline]
    #[must_use]
    pub fn is_translating(&self) -> bool {
        self.outstanding > 0
    }

    /// Number of running batches
    #[inline]
    #[must_use]
    pub fn outstanding_batches(&self) -> usize {
        self.outstanding
    }

    /// Register a new batch and mark the context busy
    pub(crate) fn begin_batch(&mut self) -> BatchToken {
        let token = BatchToken {
            epoch: self.epoch,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.outstanding += 1;
        token
    }

    /// Apply one paragraph outcome of the batch `token`
    pub(crate) fn reconcile(
        &mut self,
        token: BatchToken,
        index: usize,
        outcome: Result<String, ()>,
    ) -> Reconciled {
        if !token.is_current(self.epoch) {
            return Reconciled::Stale;
        }

        match outcome {
            Ok(text) => {
                self.failed.remove(&index);
                self.translations.insert(index, text);
                Reconciled::Translated
            }
            Err(()) => {
                // An earlier successful translation stays visible
                if !self.translations.contains_key(&index) {
                    self.failed.insert(index);
                }
                Reconciled::Failed
            }
        }
    }

    /// Mark batch `token` as fully resolved; false if it was stale
    pub(crate) fn finish_batch(&mut self, token: BatchToken) -> bool {
        if !token.is_current(self.epoch) {
            return false;
        }
        self.outstanding = self.outstanding.saturating_sub(1);
        true
    }
}

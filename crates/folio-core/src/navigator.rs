//! Chapter navigation and context tokens
//!
//! Every chapter activation (and every document load) opens a new context,
//! identified by a monotonically increasing [`ContextEpoch`]. A fresh
//! [`ChapterContext`] is created for it, so selection and translation results
//! from the previous chapter cannot survive the switch. Batches are tagged
//! with the epoch current at dispatch time.

use crate::context::ChapterContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one chapter activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextEpoch(u64);

impl ContextEpoch {
    /// Raw counter value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ContextEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Tag tying a translation batch to the context it was dispatched in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchToken {
    /// Context the batch belongs to
    pub epoch: ContextEpoch,
    /// Batch number within that context
    pub sequence: u64,
}

impl BatchToken {
    /// Whether results of this batch may still be applied
    #[inline]
    #[must_use]
    pub fn is_current(&self, epoch: ContextEpoch) -> bool {
        self.epoch == epoch
    }
}

impl fmt::Display for BatchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.epoch, self.sequence)
    }
}

/// What a chapter request resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterTarget {
    /// An existing chapter
    Chapter(usize),
    /// No chapter at that index; the empty placeholder is shown
    Placeholder(usize),
}

impl ChapterTarget {
    /// Requested index
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Chapter(index) | Self::Placeholder(index) => index,
        }
    }

    /// Whether the placeholder is shown
    #[inline]
    #[must_use]
    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Tracks the active chapter and hands out fresh contexts
#[derive(Debug, Default)]
pub struct ChapterNavigator {
    active: usize,
    epoch: ContextEpoch,
}

impl ChapterNavigator {
    /// Create a navigator at chapter 0
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active chapter index
    #[inline]
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Current context epoch
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> ContextEpoch {
        self.epoch
    }

    /// Activate chapter `index` out of `chapter_count`
    ///
    /// Out-of-range indices are accepted and resolve to the placeholder.
    pub fn activate(&mut self, index: usize, chapter_count: usize) -> (ChapterTarget, ChapterContext) {
        self.active = index;
        self.epoch = self.epoch.next();

        let target = if index < chapter_count {
            ChapterTarget::Chapter(index)
        } else {
            ChapterTarget::Placeholder(index)
        };
        (target, ChapterContext::new(index, self.epoch))
    }

    /// Return to chapter 0 with a fresh context (document load or close)
    pub fn reset(&mut self) -> ChapterContext {
        self.activate(0, 0).1
    }
}

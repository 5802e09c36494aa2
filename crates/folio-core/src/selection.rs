//! Selection tracker
//!
//! The set of paragraph indices marked for translation within the active
//! chapter. Only positions are stored, never paragraph text.

use std::collections::BTreeSet;

/// Paragraph indices selected within one chapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    /// Create an empty selection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `index`; returns whether it is now selected
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    /// Whether `index` is selected
    #[inline]
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Selected indices in ascending order
    #[inline]
    #[must_use]
    pub fn selected_indices(&self) -> &BTreeSet<usize> {
        &self.indices
    }

    /// Iterate selected indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Number of selected paragraphs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Drop every index
    #[inline]
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

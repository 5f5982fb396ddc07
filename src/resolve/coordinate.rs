//! Ordered label sequences with O(1) label lookup

use indexmap::IndexSet;

/// Ordered, duplicate-free labels of one axis, plus optional element text
///
/// Used for one-dimensional Sets, the universe, and every resolved dimension
/// of a dense array. Shared via `Arc` once built; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    name: String,
    labels: IndexSet<String>,
    texts: Vec<Option<String>>,
}

impl Coordinate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: IndexSet::new(),
            texts: Vec::new(),
        }
    }

    /// Build from labels, keeping the first occurrence of each
    pub fn from_labels<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut coord = Self::new(name);
        for label in labels {
            coord.push(label, None);
        }
        coord
    }

    /// Append a label if not present; returns its position
    ///
    /// Text of a repeated label is kept from its first occurrence unless
    /// that one had none.
    pub(crate) fn push(&mut self, label: impl Into<String>, text: Option<String>) -> usize {
        let (pos, inserted) = self.labels.insert_full(label.into());
        if inserted {
            self.texts.push(text);
        } else if self.texts[pos].is_none() {
            self.texts[pos] = text;
        }
        pos
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label` on this axis
    #[inline]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    #[inline]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    #[inline]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get_index(index).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Element text attached to `label`, if any
    pub fn text(&self, label: &str) -> Option<&str> {
        self.position(label)
            .and_then(|pos| self.texts[pos].as_deref())
    }

    /// Whether every label in `labels` is on this axis
    pub fn covers<'a, I>(&self, labels: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().all(|l| self.contains(l))
    }
}

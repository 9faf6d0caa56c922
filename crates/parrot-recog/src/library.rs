//! Labeled reference sequences.

use std::collections::BTreeMap;

use parrot_dtw::Sequence;

use crate::label::Label;

/// A mapping from label to an optional reference sequence.
///
/// An absent entry (`None`) records that the label is known but no reference
/// is available, e.g. because its recording was missing upstream. Recognition
/// skips absent entries.
///
/// Entries iterate in ascending [`Label`] order regardless of insertion order.
/// That order is the one recognition uses to break exact distance ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLibrary {
    entries: BTreeMap<Label, Option<Sequence>>,
}

impl TemplateLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reference sequence, replacing any previous entry for `label`.
    pub fn insert(&mut self, label: impl Into<Label>, template: Sequence) {
        self.entries.insert(label.into(), Some(template));
    }

    /// Record `label` as known but without a reference sequence.
    pub fn insert_missing(&mut self, label: impl Into<Label>) {
        self.entries.insert(label.into(), None);
    }

    /// Insert an optional reference sequence.
    pub fn insert_entry(&mut self, label: impl Into<Label>, template: Option<Sequence>) {
        self.entries.insert(label.into(), template);
    }

    /// Return the reference sequence for `label`, if present.
    #[must_use]
    pub fn template(&self, label: &str) -> Option<&Sequence> {
        self.entries.get(label).and_then(Option::as_ref)
    }

    /// Return true if `label` has an entry, present or absent.
    #[must_use]
    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Iterate over all entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, Option<&Sequence>)> + '_ {
        self.entries.iter().map(|(label, t)| (label, t.as_ref()))
    }

    /// Iterate over entries that have a reference sequence, in label order.
    pub fn present(&self) -> impl Iterator<Item = (&Label, &Sequence)> + '_ {
        self.entries
            .iter()
            .filter_map(|(label, t)| t.as_ref().map(|t| (label, t)))
    }

    /// Iterate over all labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.entries.keys()
    }

    /// Return the number of entries, present or absent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the library has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the number of entries with a reference sequence.
    #[must_use]
    pub fn n_present(&self) -> usize {
        self.present().count()
    }

    /// Return true if at least one entry has a reference sequence.
    #[must_use]
    pub fn has_templates(&self) -> bool {
        self.present().next().is_some()
    }
}

impl<L: Into<Label>> FromIterator<(L, Option<Sequence>)> for TemplateLibrary {
    fn from_iter<I: IntoIterator<Item = (L, Option<Sequence>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(l, t)| (l.into(), t)).collect(),
        }
    }
}

impl<L: Into<Label>> Extend<(L, Option<Sequence>)> for TemplateLibrary {
    fn extend<I: IntoIterator<Item = (L, Option<Sequence>)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(l, t)| (l.into(), t)));
    }
}

//! Nearest-template recognition.
//!
//! The query is aligned against every present template and the label with
//! the smallest alignment distance wins. Candidates are visited in label
//! order and only a strictly smaller distance replaces the current best, so
//! on exact ties the lexicographically first label is returned. The parallel
//! scan reduces its results in the same order and returns the same answer.

use rayon::prelude::*;
use tracing::{debug, instrument};

use parrot_dtw::{Aligner, AlignmentCost, LocalCost, Metric, Sequence, SequenceView};

use crate::error::RecogError;
use crate::label::Label;
use crate::library::TemplateLibrary;

/// Outcome of one recognition: the best label and its distance.
///
/// When no comparison could be made (absent query, or no template present)
/// the label is `None` and the distance is [`AlignmentCost::INFINITY`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    label: Option<Label>,
    distance: AlignmentCost,
}

impl Recognition {
    /// The `(None, +inf)` result.
    #[must_use]
    pub fn unrecognized() -> Self {
        Self {
            label: None,
            distance: AlignmentCost::INFINITY,
        }
    }

    /// Return the recognized label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Return the alignment distance to the recognized template.
    #[must_use]
    pub fn distance(&self) -> AlignmentCost {
        self.distance
    }

    /// Return true if a label was recognized.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.label.is_some()
    }

    /// Consume the result, returning `(label, distance)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<Label>, AlignmentCost) {
        (self.label, self.distance)
    }
}

/// Distance from the query to one template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateScore {
    /// Template label.
    pub label: Label,
    /// Alignment distance between the query and the template.
    pub distance: AlignmentCost,
}

/// Minimum-distance classifier over a [`TemplateLibrary`].
#[derive(Debug, Clone, Default)]
pub struct Recognizer<C = Metric> {
    aligner: Aligner<C>,
    parallel: bool,
}

impl<C: LocalCost> Recognizer<C> {
    /// Create a sequential recognizer around `aligner`.
    #[must_use]
    pub fn new(aligner: Aligner<C>) -> Self {
        Self {
            aligner,
            parallel: false,
        }
    }

    /// Enable or disable the parallel template scan.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return the aligner used for every comparison.
    #[must_use]
    pub fn aligner(&self) -> &Aligner<C> {
        &self.aligner
    }

    /// Return whether template alignments run in parallel.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Find the template label closest to `query`.
    ///
    /// An absent query or a library without any present template yields
    /// [`Recognition::unrecognized`]; absent templates are skipped.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RecogError::Template`] | Aligning the query with some template failed, e.g. on a feature dimension mismatch |
    ///
    /// With several failing templates the first one in label order is reported.
    #[instrument(skip_all, fields(n_templates = library.len(), query_len = query.map(|q| q.len())))]
    pub fn recognize(
        &self,
        library: &TemplateLibrary,
        query: Option<SequenceView<'_>>,
    ) -> Result<Recognition, RecogError> {
        let Some(query) = query else {
            debug!("no query sequence");
            return Ok(Recognition::unrecognized());
        };

        let mut best = Recognition::unrecognized();
        for score in self.scores(library, query)? {
            if score.distance.value() < best.distance.value() {
                best = Recognition {
                    label: Some(score.label),
                    distance: score.distance,
                };
            }
        }

        debug!(
            label = best.label.as_ref().map(Label::as_str),
            distance = best.distance.value(),
            "recognition complete"
        );
        Ok(best)
    }

    /// Convenience wrapper for [`Recognizer::recognize`] on an owned sequence.
    ///
    /// # Errors
    ///
    /// Same as [`Recognizer::recognize`].
    pub fn recognize_sequence(
        &self,
        library: &TemplateLibrary,
        query: Option<&Sequence>,
    ) -> Result<Recognition, RecogError> {
        self.recognize(library, query.map(Sequence::as_view))
    }

    /// Score `query` against every present template, nearest first.
    ///
    /// Equal distances are ordered by label.
    ///
    /// # Errors
    ///
    /// Same as [`Recognizer::recognize`].
    #[instrument(skip_all, fields(n_templates = library.len(), query_len = query.len()))]
    pub fn rank(
        &self,
        library: &TemplateLibrary,
        query: SequenceView<'_>,
    ) -> Result<Vec<TemplateScore>, RecogError> {
        let mut scores = self.scores(library, query)?;
        // Stable sort: scores arrive in label order.
        scores.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(scores)
    }

    /// Distances to every present template, in label order.
    fn scores(
        &self,
        library: &TemplateLibrary,
        query: SequenceView<'_>,
    ) -> Result<Vec<TemplateScore>, RecogError> {
        for label in library.iter().filter(|(_, t)| t.is_none()).map(|(l, _)| l) {
            debug!(label = label.as_str(), "no reference for label, skipping");
        }

        let present: Vec<(&Label, &Sequence)> = library.present().collect();
        if present.is_empty() {
            debug!("library has no present templates");
            return Ok(Vec::new());
        }

        let score = |&(label, template): &(&Label, &Sequence)| {
            self.aligner
                .distance(query, template.as_view())
                .map(|distance| TemplateScore {
                    label: label.clone(),
                    distance,
                })
                .map_err(|source| RecogError::Template {
                    label: label.to_string(),
                    source,
                })
        };

        if self.parallel {
            // Collect per-template results first so that the reported error does
            // not depend on which worker finishes first.
            let results: Vec<Result<TemplateScore, RecogError>> =
                present.par_iter().map(score).collect();
            results.into_iter().collect()
        } else {
            present.iter().map(score).collect()
        }
    }
}

//! Recognition accuracy over labeled test sets.

use tracing::{debug, info, instrument, warn};

use parrot_dtw::LocalCost;

use crate::confusion::ConfusionMatrix;
use crate::error::RecogError;
use crate::label::Label;
use crate::library::TemplateLibrary;
use crate::recognize::Recognizer;

/// Aggregated outcome of [`Recognizer::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// `n_correct / n_tested`, or 0.0 when nothing was tested.
    pub accuracy: f64,
    /// Queries recognized as their true label.
    pub n_correct: usize,
    /// Queries that were present and submitted for recognition.
    pub n_tested: usize,
    /// Tested queries for which no label could be produced.
    pub n_unrecognized: usize,
    /// Class/test-set pairs without a query.
    pub n_skipped: usize,
    /// Outcomes whose true and predicted labels are both in the class list.
    pub confusion: ConfusionMatrix,
}

impl Evaluation {
    fn empty(classes: &[Label]) -> Self {
        Self {
            accuracy: 0.0,
            n_correct: 0,
            n_tested: 0,
            n_unrecognized: 0,
            n_skipped: 0,
            confusion: ConfusionMatrix::new(classes),
        }
    }
}

impl<C: LocalCost> Recognizer<C> {
    /// Recognize every query in `test_sets` against `library` and tally the
    /// results per class.
    ///
    /// Test sets are visited in order; within each, `classes` are visited in
    /// the given order and the entry for each class is the query whose true
    /// label is that class. Absent queries are skipped. Unrecognized queries
    /// and predictions outside `classes` count as tested but stay out of the
    /// confusion matrix.
    ///
    /// A library without any present template returns an all-zero result.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RecogError::Template`] | A query could not be aligned with a template |
    #[instrument(skip_all, fields(n_sets = test_sets.len(), n_classes = classes.len()))]
    pub fn evaluate(
        &self,
        library: &TemplateLibrary,
        test_sets: &[TemplateLibrary],
        classes: &[Label],
    ) -> Result<Evaluation, RecogError> {
        let mut eval = Evaluation::empty(classes);

        if !library.has_templates() {
            warn!("template library is empty or all templates are missing, nothing evaluated");
            return Ok(eval);
        }

        for (set_index, test_set) in test_sets.iter().enumerate() {
            if test_set.is_empty() {
                debug!(set_index, "empty test set, skipping");
                continue;
            }

            for true_label in classes {
                let Some(query) = test_set.template(true_label.as_str()) else {
                    eval.n_skipped += 1;
                    continue;
                };

                eval.n_tested += 1;
                let recognition = self.recognize(library, Some(query.as_view()))?;

                let Some(predicted) = recognition.label() else {
                    debug!(set_index, label = true_label.as_str(), "query not recognized");
                    eval.n_unrecognized += 1;
                    continue;
                };

                if !eval.confusion.record(true_label.as_str(), predicted.as_str()) {
                    debug!(
                        predicted = predicted.as_str(),
                        "predicted label outside the class list"
                    );
                }
                if predicted == true_label {
                    eval.n_correct += 1;
                }
            }
        }

        eval.accuracy = if eval.n_tested == 0 {
            0.0
        } else {
            eval.n_correct as f64 / eval.n_tested as f64
        };

        info!(
            accuracy = eval.accuracy,
            n_correct = eval.n_correct,
            n_tested = eval.n_tested,
            n_unrecognized = eval.n_unrecognized,
            "evaluation complete"
        );
        Ok(eval)
    }
}

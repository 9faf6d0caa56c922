//! Configuration builder for template recognition.

use parrot_dtw::{Aligner, Metric};

use crate::recognize::Recognizer;

/// Configuration for a [`Recognizer`].
///
/// Construct via [`RecognizerConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter  | Default             |
/// |------------|---------------------|
/// | `metric`   | `Metric::Euclidean` |
/// | `parallel` | `false`             |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecognizerConfig {
    pub(crate) metric: Metric,
    pub(crate) parallel: bool,
}

impl RecognizerConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local cost metric used between frames.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Align the query against templates on the rayon thread pool.
    ///
    /// Results are identical to the sequential scan.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return the local cost metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Return whether template alignments run in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Build a recognizer from this configuration.
    #[must_use]
    pub fn build(&self) -> Recognizer {
        Recognizer::new(Aligner::new(self.metric)).with_parallel(self.parallel)
    }
}

//! JSON result writer for alignment, recognition, and evaluation outputs.

use std::fs;
use std::path::{Path, PathBuf};

use parrot_dtw::{Alignment, AlignmentCost, Metric};
use parrot_recog::{Evaluation, Recognition, TemplateScore};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_align.json`,
/// `{experiment}_recognize.json` and `{experiment}_evaluate.json`.
/// Infinite distances are written as `null`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write an alignment to `{experiment}_align.json` and return its path.
    ///
    /// The cumulative cost matrix is included only when `include_matrix` is set.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | JSON encoding failed |
    /// | [`IoError::WriteFile`] | file write failed |
    #[instrument(skip_all)]
    pub fn write_alignment(
        &self,
        metric: Metric,
        alignment: &Alignment,
        include_matrix: bool,
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("align");
        let matrix = alignment.cost_matrix();

        let artifact = AlignArtifact {
            experiment: self.experiment.as_str(),
            metric: metric.name(),
            distance: finite_or_null(alignment.distance()),
            n_rows: matrix.n_rows(),
            n_cols: matrix.n_cols(),
            path: alignment.path().to_pairs(),
            cost_matrix: include_matrix.then(|| matrix.to_rows()),
        };

        write_json(&path, &artifact)?;
        info!(path = %path.display(), "alignment written");
        Ok(path)
    }

    /// Write a recognition result and its ranking to `{experiment}_recognize.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | JSON encoding failed |
    /// | [`IoError::WriteFile`] | file write failed |
    #[instrument(skip_all)]
    pub fn write_recognition(
        &self,
        metric: Metric,
        query: &str,
        recognition: &Recognition,
        ranking: &[TemplateScore],
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("recognize");

        let artifact = RecognizeArtifact {
            experiment: self.experiment.as_str(),
            metric: metric.name(),
            query,
            label: recognition.label().map(|l| l.as_str()),
            distance: finite_or_null(recognition.distance()),
            ranking: ranking.iter().map(ScoreEntry::from).collect(),
        };

        write_json(&path, &artifact)?;
        info!(path = %path.display(), "recognition written");
        Ok(path)
    }

    /// Write evaluation results to `{experiment}_evaluate.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | JSON encoding failed |
    /// | [`IoError::WriteFile`] | file write failed |
    #[instrument(skip_all)]
    pub fn write_evaluation(
        &self,
        metric: Metric,
        n_test_sets: usize,
        evaluation: &Evaluation,
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("evaluate");
        let confusion = &evaluation.confusion;

        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            metric: metric.name(),
            n_test_sets,
            accuracy: evaluation.accuracy,
            n_correct: evaluation.n_correct,
            n_tested: evaluation.n_tested,
            n_unrecognized: evaluation.n_unrecognized,
            n_skipped: evaluation.n_skipped,
            labels: confusion.labels().iter().map(|l| l.as_str()).collect(),
            confusion_matrix: confusion.as_rows(),
            class_metrics: confusion
                .class_metrics()
                .into_iter()
                .map(|m| ClassEntry {
                    label: m.label.into_string(),
                    precision: m.precision,
                    recall: m.recall,
                    f1: m.f1,
                    support: m.support,
                })
                .collect(),
        };

        write_json(&path, &artifact)?;
        info!(path = %path.display(), "evaluation written");
        Ok(path)
    }

    /// Return the path where a compiled template library should be saved.
    ///
    /// Does not write anything; just computes `{output_dir}/{experiment}_library.bin`.
    #[must_use]
    pub fn library_path(&self) -> PathBuf {
        self.artifact_path_ext("library", "bin")
    }

    fn artifact_path(&self, kind: &str) -> PathBuf {
        self.artifact_path_ext(kind, "json")
    }

    fn artifact_path_ext(&self, kind: &str, ext: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.{ext}", self.experiment.as_str()))
    }
}

fn finite_or_null(cost: AlignmentCost) -> Option<f64> {
    cost.is_finite().then(|| cost.value())
}

fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, &json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct AlignArtifact<'a> {
    experiment: &'a str,
    metric: &'a str,
    distance: Option<f64>,
    n_rows: usize,
    n_cols: usize,
    path: Vec<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_matrix: Option<Vec<Vec<f64>>>,
}

#[derive(Serialize)]
struct RecognizeArtifact<'a> {
    experiment: &'a str,
    metric: &'a str,
    query: &'a str,
    label: Option<&'a str>,
    distance: Option<f64>,
    ranking: Vec<ScoreEntry<'a>>,
}

#[derive(Serialize)]
struct ScoreEntry<'a> {
    label: &'a str,
    distance: Option<f64>,
}

impl<'a> From<&'a TemplateScore> for ScoreEntry<'a> {
    fn from(score: &'a TemplateScore) -> Self {
        Self {
            label: score.label.as_str(),
            distance: finite_or_null(score.distance),
        }
    }
}

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    metric: &'a str,
    n_test_sets: usize,
    accuracy: f64,
    n_correct: usize,
    n_tested: usize,
    n_unrecognized: usize,
    n_skipped: usize,
    labels: Vec<&'a str>,
    confusion_matrix: &'a [Vec<usize>],
    class_metrics: Vec<ClassEntry>,
}

#[derive(Serialize)]
struct ClassEntry {
    label: String,
    precision: f64,
    recall: f64,
    f1: f64,
    support: usize,
}

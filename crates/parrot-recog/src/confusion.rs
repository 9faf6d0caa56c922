//! Confusion matrix and per-label classification metrics.

use std::fmt;

use crate::label::Label;

/// A confusion matrix over an ordered list of labels.
///
/// Entry `matrix[t][p]` counts how many queries whose true label is
/// `labels[t]` were recognized as `labels[p]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    labels: Vec<Label>,
    matrix: Vec<Vec<usize>>,
}

/// Per-label precision, recall, and F1 score.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    /// The label these metrics describe.
    pub label: Label,
    /// Precision: TP / (TP + FP). 0.0 if the label was never predicted.
    pub precision: f64,
    /// Recall: TP / (TP + FN). 0.0 if no query had this true label.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of recorded queries with this true label.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix over `labels`, in the given order.
    #[must_use]
    pub fn new(labels: &[Label]) -> Self {
        let n = labels.len();
        Self {
            labels: labels.to_vec(),
            matrix: vec![vec![0usize; n]; n],
        }
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.as_str() == label)
    }

    /// Record one outcome.
    ///
    /// Returns `false`, leaving the matrix unchanged, if either label is not
    /// part of the matrix.
    pub fn record(&mut self, true_label: &str, predicted: &str) -> bool {
        match (self.index_of(true_label), self.index_of(predicted)) {
            (Some(t), Some(p)) => {
                self.matrix[t][p] += 1;
                true
            }
            _ => false,
        }
    }

    /// Return how often `true_label` was recognized as `predicted`.
    ///
    /// Unknown labels count as zero.
    #[must_use]
    pub fn count(&self, true_label: &str, predicted: &str) -> usize {
        match (self.index_of(true_label), self.index_of(predicted)) {
            (Some(t), Some(p)) => self.matrix[t][p],
            _ => 0,
        }
    }

    /// Return the number of recorded outcomes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flat_map(|row| row.iter()).sum()
    }

    /// Proportion of recorded outcomes on the diagonal.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.labels.len()).map(|i| self.matrix[i][i]).sum();
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Per-label precision, recall, F1, and support, in label order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.labels.len();
        self.labels
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let tp = self.matrix[c][c];
                let fp: usize = (0..n).filter(|&i| i != c).map(|i| self.matrix[i][c]).sum();
                let fn_: usize = (0..n).filter(|&j| j != c).map(|j| self.matrix[c][j]).sum();
                let support = tp + fn_;
                let precision = if tp + fp == 0 {
                    0.0
                } else {
                    tp as f64 / (tp + fp) as f64
                };
                let recall = if support == 0 {
                    0.0
                } else {
                    tp as f64 / support as f64
                };
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the matrix rows, indexed by true label.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the labels in matrix order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|l| l.as_str().len())
            .max()
            .unwrap_or(0)
            .max(5);

        write!(f, "{:>width$}", "")?;
        for label in &self.labels {
            write!(f, " {:>width$}", label.as_str())?;
        }
        writeln!(f)?;

        for (label, row) in self.labels.iter().zip(&self.matrix) {
            write!(f, "{:>width$}", label.as_str())?;
            for val in row {
                write!(f, " {val:>width$}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

//! Local cost functions between two frames.

use std::fmt;

/// Distance between one frame of each sequence.
///
/// Implementations must return a non-negative value and be symmetric in their
/// two arguments. Both slices always have the same length.
///
/// Any `Fn(&[f64], &[f64]) -> f64 + Send + Sync` closure is a `LocalCost`.
pub trait LocalCost: Send + Sync {
    /// Cost of aligning frame `a` with frame `b`.
    fn cost(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<F> LocalCost for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    fn cost(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// Built-in frame metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// L2 norm of the difference. Absolute difference for scalar frames.
    #[default]
    Euclidean,
    /// L1 norm of the difference.
    Manhattan,
    /// Squared L2 norm of the difference.
    SquaredEuclidean,
}

impl Metric {
    /// Return the canonical lowercase name of the metric.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::SquaredEuclidean => "squared-euclidean",
        }
    }
}

impl LocalCost for Metric {
    #[inline]
    fn cost(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Self::Euclidean => squared_l2(a, b).sqrt(),
            Self::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            Self::SquaredEuclidean => squared_l2(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn squared_l2(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

//! DTW alignment of two feature sequences.

use tracing::{debug, instrument};

use crate::cost::{LocalCost, Metric};
use crate::distance::AlignmentCost;
use crate::error::AlignError;
use crate::matrix::CostMatrix;
use crate::path::{Move, WarpingPath, WarpingStep};
use crate::sequence::{Sequence, SequenceView};

/// Result of aligning two sequences: total cost, one optimal path, and the
/// cumulative cost matrix it was traced through.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    distance: AlignmentCost,
    path: WarpingPath,
    cost_matrix: CostMatrix,
}

impl Alignment {
    /// Return the minimal cumulative alignment cost.
    #[must_use]
    pub fn distance(&self) -> AlignmentCost {
        self.distance
    }

    /// Return the optimal warping path from `(0, 0)` to `(m-1, n-1)`.
    #[must_use]
    pub fn path(&self) -> &WarpingPath {
        &self.path
    }

    /// Return the cumulative cost matrix.
    #[must_use]
    pub fn cost_matrix(&self) -> &CostMatrix {
        &self.cost_matrix
    }

    /// Consume the alignment, returning `(distance, path, cost_matrix)`.
    #[must_use]
    pub fn into_parts(self) -> (AlignmentCost, WarpingPath, CostMatrix) {
        (self.distance, self.path, self.cost_matrix)
    }
}

/// Immutable DTW aligner, parameterised by its local cost function.
///
/// Always computes the full, unbanded cost matrix: every alignment is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aligner<C = Metric> {
    cost: C,
}

impl Aligner<Metric> {
    /// Create an aligner using one of the built-in metrics.
    #[must_use]
    pub fn new(metric: Metric) -> Self {
        Self { cost: metric }
    }

    /// Create an aligner using Euclidean distance between frames.
    #[must_use]
    pub fn euclidean() -> Self {
        Self::new(Metric::Euclidean)
    }
}

impl<C: LocalCost> Aligner<C> {
    /// Create an aligner from any [`LocalCost`], including closures.
    #[must_use]
    pub fn with_cost(cost: C) -> Self {
        Self { cost }
    }

    /// Return the local cost function.
    #[must_use]
    pub fn local_cost(&self) -> &C {
        &self.cost
    }

    /// Align two sequences, returning the distance, an optimal path, and the
    /// cumulative cost matrix.
    ///
    /// Runs in O(m * n) time and space.
    ///
    /// Among equal-cost predecessors the traceback prefers the diagonal, then
    /// the vertical step (advance in `a` only), then the horizontal step.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::EmptySequence`] | Either sequence has no frames |
    /// | [`AlignError::DimensionMismatch`] | Frame dimensions differ |
    #[instrument(skip_all, fields(m = a.len(), n = b.len(), dim = a.dim()))]
    pub fn align(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<Alignment, AlignError> {
        check_pair(a, b)?;

        let cost_matrix = self.cumulative(a, b);
        let path = WarpingPath::new(traceback(&cost_matrix));
        let distance = AlignmentCost::new(cost_matrix.final_cost());

        debug!(distance = distance.value(), path_len = path.len(), "alignment complete");
        Ok(Alignment {
            distance,
            path,
            cost_matrix,
        })
    }

    /// Validate two lists of raw frames and align them.
    ///
    /// # Errors
    ///
    /// Any validation error from [`Sequence::from_frames`] for either side,
    /// then the errors of [`Aligner::align`].
    pub fn align_frames<A, B>(&self, a: &[A], b: &[B]) -> Result<Alignment, AlignError>
    where
        A: AsRef<[f64]>,
        B: AsRef<[f64]>,
    {
        let a = Sequence::from_frames(a)?;
        let b = Sequence::from_frames(b)?;
        self.align(a.as_view(), b.as_view())
    }

    /// Compute only the alignment distance.
    ///
    /// Same recurrence and result as [`Aligner::align`], but keeps two rows of
    /// the matrix instead of all of them. O(m * n) time, O(n) space.
    ///
    /// # Errors
    ///
    /// Same as [`Aligner::align`].
    #[instrument(skip_all, fields(m = a.len(), n = b.len()))]
    pub fn distance(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
    ) -> Result<AlignmentCost, AlignError> {
        check_pair(a, b)?;

        let m = a.len();
        let n = b.len();
        let mut prev = vec![0.0; n];
        let mut curr = vec![0.0; n];

        for i in 0..m {
            let fa = a.frame(i);
            for j in 0..n {
                let c = self.cost.cost(fa, b.frame(j));
                curr[j] = match (i, j) {
                    (0, 0) => c,
                    (0, _) => c + curr[j - 1],
                    (_, 0) => c + prev[0],
                    _ => c + prev[j].min(curr[j - 1]).min(prev[j - 1]),
                };
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last completed row.
        Ok(AlignmentCost::new(prev[n - 1]))
    }

    /// Compute the matrix of local costs `c(i, j)` without accumulation.
    ///
    /// # Errors
    ///
    /// Same as [`Aligner::align`].
    pub fn local_costs(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
    ) -> Result<CostMatrix, AlignError> {
        check_pair(a, b)?;

        let n = b.len();
        let mut data = Vec::with_capacity(a.len() * n);
        for i in 0..a.len() {
            let fa = a.frame(i);
            data.extend((0..n).map(|j| self.cost.cost(fa, b.frame(j))));
        }
        Ok(CostMatrix::from_raw(a.len(), n, data))
    }

    /// Fill the full cumulative cost matrix.
    ///
    /// Cell `(i, j)` lives at flat index `i * n + j`; `above` is `idx - n`,
    /// `left` is `idx - 1`, `diag` is `idx - n - 1`.
    fn cumulative(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> CostMatrix {
        let m = a.len();
        let n = b.len();
        let mut d = vec![0.0; m * n];

        for i in 0..m {
            let fa = a.frame(i);
            for j in 0..n {
                let c = self.cost.cost(fa, b.frame(j));
                let idx = i * n + j;
                d[idx] = match (i, j) {
                    (0, 0) => c,
                    (0, _) => c + d[idx - 1],
                    (_, 0) => c + d[idx - n],
                    _ => c + d[idx - n].min(d[idx - 1]).min(d[idx - n - 1]),
                };
            }
        }

        CostMatrix::from_raw(m, n, d)
    }
}

fn check_pair(a: SequenceView<'_>, b: SequenceView<'_>) -> Result<(), AlignError> {
    if a.is_empty() || b.is_empty() {
        return Err(AlignError::EmptySequence);
    }
    if a.dim() != b.dim() {
        return Err(AlignError::DimensionMismatch {
            left: a.dim(),
            right: b.dim(),
        });
    }
    Ok(())
}

/// Trace one optimal path from `(m-1, n-1)` back to `(0, 0)` and return it
/// in forward order.
fn traceback(d: &CostMatrix) -> Vec<WarpingStep> {
    let mut i = d.n_rows() - 1;
    let mut j = d.n_cols() - 1;
    let mut steps = Vec::with_capacity(i + j + 1);
    steps.push(WarpingStep { i, j });

    while i > 0 || j > 0 {
        let step = if i == 0 {
            Move::Horizontal
        } else if j == 0 {
            Move::Vertical
        } else {
            Move::choose(d.get(i - 1, j - 1), d.get(i - 1, j), d.get(i, j - 1))
        };
        match step {
            Move::Diagonal => {
                i -= 1;
                j -= 1;
            }
            Move::Vertical => i -= 1,
            Move::Horizontal => j -= 1,
        }
        steps.push(WarpingStep { i, j });
    }

    steps.reverse();
    steps
}

//! Warping path types for DTW alignment.

/// A single step of a warping path, pairing frame `i` of the first sequence
/// with frame `j` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarpingStep {
    /// Frame index in the first sequence.
    pub i: usize,
    /// Frame index in the second sequence.
    pub j: usize,
}

impl WarpingStep {
    /// Create a step pairing frame `i` with frame `j`.
    #[must_use]
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl From<(usize, usize)> for WarpingStep {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

/// Direction of one step along a warping path, read forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// `(i, j) -> (i + 1, j + 1)`.
    Diagonal,
    /// `(i, j) -> (i + 1, j)`.
    Vertical,
    /// `(i, j) -> (i, j + 1)`.
    Horizontal,
}

impl Move {
    /// Choose the predecessor during traceback from the cumulative costs of the
    /// three candidate cells.
    ///
    /// Priority on ties is diagonal, then vertical, then horizontal: diagonal
    /// wins if it is `<=` both others, otherwise vertical wins if it is `<=`
    /// horizontal.
    #[inline]
    #[must_use]
    pub fn choose(diagonal: f64, vertical: f64, horizontal: f64) -> Self {
        if diagonal <= vertical && diagonal <= horizontal {
            Self::Diagonal
        } else if vertical <= horizontal {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// Classify the forward move between two consecutive steps.
    ///
    /// Returns `None` if `to` is not reachable from `from` in one step.
    #[must_use]
    pub fn between(from: WarpingStep, to: WarpingStep) -> Option<Self> {
        match (to.i.checked_sub(from.i)?, to.j.checked_sub(from.j)?) {
            (1, 1) => Some(Self::Diagonal),
            (1, 0) => Some(Self::Vertical),
            (0, 1) => Some(Self::Horizontal),
            _ => None,
        }
    }
}

/// An ordered sequence of warping steps from `(0, 0)` to `(m-1, n-1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a new warping path from a vector of steps.
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the first step, always `(0, 0)` for a computed path.
    #[must_use]
    pub fn first(&self) -> Option<WarpingStep> {
        self.0.first().copied()
    }

    /// Return the last step, always `(m-1, n-1)` for a computed path.
    #[must_use]
    pub fn last(&self) -> Option<WarpingStep> {
        self.0.last().copied()
    }

    /// Iterate over the forward moves between consecutive steps.
    pub fn moves(&self) -> impl Iterator<Item = Option<Move>> + '_ {
        self.0.windows(2).map(|w| Move::between(w[0], w[1]))
    }

    /// Copy the path into `(i, j)` index pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.0.iter().map(|s| (s.i, s.j)).collect()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

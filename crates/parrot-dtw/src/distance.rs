//! Alignment cost newtype wrapper.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative cumulative alignment cost.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AlignmentCost(f64);

impl AlignmentCost {
    /// Zero cost, the distance between a sequence and itself.
    pub const ZERO: Self = Self(0.0);

    /// Infinite cost, used as the "no comparison was made" sentinel.
    pub const INFINITY: Self = Self(f64::INFINITY);

    /// Create a new alignment cost from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw cost value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return true unless this is the infinite sentinel.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for AlignmentCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

//! Dynamic time warping over multivariate feature sequences.
//!
//! Pure math library with zero I/O. Aligns two sequences of fixed-dimension
//! frames by filling the full cumulative cost matrix, then traces one optimal
//! warping path back from the final cell with a fixed tie-breaking order.

mod align;
mod cost;
mod distance;
mod error;
mod matrix;
mod path;
mod sequence;

pub use align::{Aligner, Alignment};
pub use cost::{LocalCost, Metric};
pub use distance::AlignmentCost;
pub use error::AlignError;
pub use matrix::CostMatrix;
pub use path::{Move, WarpingPath, WarpingStep};
pub use sequence::{Sequence, SequenceView};

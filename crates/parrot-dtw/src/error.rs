//! Error types for sequence validation and alignment.

/// Errors from feature-sequence validation and DTW alignment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    /// Returned when a sequence has no frames.
    #[error("sequence must contain at least one frame")]
    EmptySequence,

    /// Returned when a sequence is built with zero-dimensional frames.
    #[error("feature vectors must have at least one component")]
    EmptyFrame,

    /// Returned when the frames of one sequence do not share a dimension.
    #[error("frame {frame} has {found} components, expected {expected}")]
    RaggedSequence {
        /// Zero-based index of the offending frame.
        frame: usize,
        /// Dimension of the first frame.
        expected: usize,
        /// Dimension of the offending frame.
        found: usize,
    },

    /// Returned when a sequence contains NaN, infinity, or negative infinity.
    #[error("non-finite value at frame {frame}, component {component}")]
    NonFiniteValue {
        /// Zero-based frame index.
        frame: usize,
        /// Zero-based component index within the frame.
        component: usize,
    },

    /// Returned when the two sequences being aligned have different frame dimensions.
    #[error("feature dimension mismatch: left sequence has {left}, right sequence has {right}")]
    DimensionMismatch {
        /// Frame dimension of the first sequence.
        left: usize,
        /// Frame dimension of the second sequence.
        right: usize,
    },
}

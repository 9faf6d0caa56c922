//! Feature-sequence types with validation guarantees.
//!
//! A sequence is an ordered list of frames (feature vectors) sharing one
//! dimension, stored row-major in a single flat buffer.

use std::ops::Index;
use std::slice::ChunksExact;

use crate::error::AlignError;

/// Owned, validated feature sequence.
///
/// Guaranteed non-empty, rectangular (every frame has the same dimension, at
/// least 1) and free of non-finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    values: Vec<f64>,
    dim: usize,
}

impl Sequence {
    /// Create a sequence from a list of frames.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::EmptySequence`] | `frames` is empty |
    /// | [`AlignError::EmptyFrame`] | The first frame has no components |
    /// | [`AlignError::RaggedSequence`] | A frame's dimension differs from the first frame's |
    /// | [`AlignError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn new(frames: Vec<Vec<f64>>) -> Result<Self, AlignError> {
        Self::from_frames(&frames)
    }

    /// Create a sequence by copying borrowed frames.
    ///
    /// # Errors
    ///
    /// Same as [`Sequence::new`].
    pub fn from_frames<F: AsRef<[f64]>>(frames: &[F]) -> Result<Self, AlignError> {
        let first = frames.first().ok_or(AlignError::EmptySequence)?;
        let dim = first.as_ref().len();
        if dim == 0 {
            return Err(AlignError::EmptyFrame);
        }

        let mut values = Vec::with_capacity(frames.len() * dim);
        for (frame, f) in frames.iter().enumerate() {
            let f = f.as_ref();
            if f.len() != dim {
                return Err(AlignError::RaggedSequence {
                    frame,
                    expected: dim,
                    found: f.len(),
                });
            }
            values.extend_from_slice(f);
        }

        check_finite(&values, dim)?;
        Ok(Self { values, dim })
    }

    /// Create a sequence from a row-major buffer of `values.len() / dim` frames.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::EmptyFrame`] | `dim` is zero |
    /// | [`AlignError::EmptySequence`] | `values` is empty |
    /// | [`AlignError::RaggedSequence`] | `values.len()` is not a multiple of `dim` |
    /// | [`AlignError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_flat(values: Vec<f64>, dim: usize) -> Result<Self, AlignError> {
        check_flat(&values, dim)?;
        Ok(Self { values, dim })
    }

    /// Create a one-dimensional sequence, one frame per scalar.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::EmptySequence`] | `values` is empty |
    /// | [`AlignError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_scalars(values: Vec<f64>) -> Result<Self, AlignError> {
        Self::from_flat(values, 1)
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView::new_unchecked(&self.values, self.dim)
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Return true if the sequence has no frames.
    ///
    /// Always `false` for a constructed [`Sequence`]; provided alongside `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the dimension shared by every frame.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return frame `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn frame(&self, index: usize) -> &[f64] {
        &self.values[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterate over the frames in order.
    pub fn frames(&self) -> ChunksExact<'_, f64> {
        self.values.chunks_exact(self.dim)
    }

    /// Return the row-major value buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.values
    }

    /// Consume the sequence, returning the row-major buffer and frame dimension.
    #[must_use]
    pub fn into_flat(self) -> (Vec<f64>, usize) {
        (self.values, self.dim)
    }
}

impl TryFrom<Vec<Vec<f64>>> for Sequence {
    type Error = AlignError;

    fn try_from(frames: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

/// Borrowed, validated view into a feature sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    values: &'a [f64],
    dim: usize,
}

impl<'a> SequenceView<'a> {
    /// Create a view over a row-major buffer, validating it like [`Sequence::from_flat`].
    ///
    /// # Errors
    ///
    /// Same as [`Sequence::from_flat`].
    pub fn new(values: &'a [f64], dim: usize) -> Result<Self, AlignError> {
        check_flat(values, dim)?;
        Ok(Self { values, dim })
    }

    /// Create a view without validation. For internal use where data is already validated.
    pub(crate) fn new_unchecked(values: &'a [f64], dim: usize) -> Self {
        Self { values, dim }
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.values.len() / self.dim
        }
    }

    /// Return true if the view has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the frame dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return frame `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn frame(&self, index: usize) -> &'a [f64] {
        &self.values[index * self.dim..(index + 1) * self.dim]
    }

    /// Return the row-major value buffer.
    #[must_use]
    pub fn as_flat(&self) -> &'a [f64] {
        self.values
    }

    /// Copy the viewed frames into an owned [`Sequence`].
    #[must_use]
    pub fn to_sequence(&self) -> Sequence {
        Sequence {
            values: self.values.to_vec(),
            dim: self.dim,
        }
    }
}

impl Index<usize> for SequenceView<'_> {
    type Output = [f64];

    fn index(&self, index: usize) -> &Self::Output {
        self.frame(index)
    }
}

impl<'a> From<&'a Sequence> for SequenceView<'a> {
    fn from(sequence: &'a Sequence) -> Self {
        sequence.as_view()
    }
}

fn check_flat(values: &[f64], dim: usize) -> Result<(), AlignError> {
    if dim == 0 {
        return Err(AlignError::EmptyFrame);
    }
    if values.is_empty() {
        return Err(AlignError::EmptySequence);
    }
    let rem = values.len() % dim;
    if rem != 0 {
        return Err(AlignError::RaggedSequence {
            frame: values.len() / dim,
            expected: dim,
            found: rem,
        });
    }
    check_finite(values, dim)
}

fn check_finite(values: &[f64], dim: usize) -> Result<(), AlignError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(AlignError::NonFiniteValue {
            frame: index / dim,
            component: index % dim,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_frames() {
        let result = Sequence::new(vec![]);
        assert!(matches!(result, Err(AlignError::EmptySequence)));
    }

    #[test]
    fn rejects_zero_dimension() {
        let result = Sequence::new(vec![vec![], vec![]]);
        assert!(matches!(result, Err(AlignError::EmptyFrame)));
    }

    #[test]
    fn rejects_ragged_frames() {
        let result = Sequence::new(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]]);
        assert_eq!(
            result.unwrap_err(),
            AlignError::RaggedSequence {
                frame: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_nan_with_position() {
        let result = Sequence::new(vec![vec![1.0, 2.0], vec![3.0, f64::NAN]]);
        assert_eq!(
            result.unwrap_err(),
            AlignError::NonFiniteValue {
                frame: 1,
                component: 1
            }
        );
    }

    #[test]
    fn rejects_infinity() {
        let result = Sequence::from_scalars(vec![1.0, f64::NEG_INFINITY]);
        assert!(matches!(
            result,
            Err(AlignError::NonFiniteValue { frame: 1, component: 0 })
        ));
    }

    #[test]
    fn flat_length_must_divide_dimension() {
        let result = Sequence::from_flat(vec![1.0, 2.0, 3.0], 2);
        assert!(matches!(result, Err(AlignError::RaggedSequence { .. })));
    }

    #[test]
    fn frames_are_row_major() {
        let seq = Sequence::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.dim(), 3);
        assert_eq!(seq.frame(1), &[4.0, 5.0, 6.0]);
        assert_eq!(seq.as_flat(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let frames: Vec<&[f64]> = seq.frames().collect();
        assert_eq!(frames, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn scalars_are_one_dimensional() {
        let seq = Sequence::from_scalars(vec![4.0, 3.0, 7.0]).unwrap();
        assert_eq!(seq.dim(), 1);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.frame(2), &[7.0]);
    }

    #[test]
    fn view_rejects_empty() {
        let result = SequenceView::new(&[], 3);
        assert!(matches!(result, Err(AlignError::EmptySequence)));
    }

    #[test]
    fn view_indexing() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let view = SequenceView::new(&data, 2).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(&view[1], &[3.0, 4.0]);
    }

    #[test]
    fn view_round_trips_to_owned() {
        let seq = Sequence::new(vec![vec![0.5, 1.5], vec![2.5, 3.5]]).unwrap();
        assert_eq!(seq.as_view().to_sequence(), seq);
        let (values, dim) = seq.into_flat();
        assert_eq!(values.len(), 4);
        assert_eq!(dim, 2);
    }
}

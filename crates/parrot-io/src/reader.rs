//! CSV feature-sequence reader with full input validation.

use std::path::{Path, PathBuf};

use parrot_dtw::Sequence;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads one feature sequence from a CSV file.
///
/// Expected CSV format:
/// - One frame per row, one feature coefficient per column
/// - Every row has the same number of columns
/// - An optional header row, skipped when enabled with [`SequenceReader::with_headers`]
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero frame rows, or rows without columns |
/// | [`IoError::InconsistentRowLength`] | Row has a different column count than the first row |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
#[derive(Debug, Clone)]
pub struct SequenceReader {
    path: PathBuf,
    has_headers: bool,
}

impl SequenceReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            has_headers: false,
        }
    }

    /// Treat the first row as a header and skip it.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Read and validate the CSV file, returning a [`Sequence`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Sequence, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut values = Vec::new();
        let mut dim = 0usize;
        let mut n_frames = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if row_index == 0 {
                dim = record.len();
                debug!(dim, "frame dimension from first row");
            } else if record.len() != dim {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: dim,
                    got: record.len(),
                });
            }

            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                values.push(value);
            }
            n_frames += 1;
        }

        // Every cell was checked above, so construction fails only on an
        // empty file or zero-width rows.
        let sequence = Sequence::from_flat(values, dim).map_err(|_| IoError::EmptyDataset {
            path: self.path.clone(),
        })?;

        info!(n_frames, dim, "feature sequence loaded");
        Ok(sequence)
    }
}

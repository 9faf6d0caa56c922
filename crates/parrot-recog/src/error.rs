//! Error types for template recognition and library persistence.

use std::path::PathBuf;

use parrot_dtw::AlignError;

/// Errors from recognition, evaluation, and template-library files.
#[derive(Debug, thiserror::Error)]
pub enum RecogError {
    /// Returned when aligning the query against a template fails.
    ///
    /// A [`AlignError::DimensionMismatch`] here means the library mixes
    /// feature dimensions with the query; the whole recognition is aborted.
    #[error("cannot align query with template \"{label}\"")]
    Template {
        /// Label of the template being compared.
        label: String,
        /// Underlying alignment error.
        #[source]
        source: AlignError,
    },

    /// Returned when bincode encoding of a library fails.
    #[error("failed to serialize template library")]
    SerializeLibrary {
        /// Underlying bincode error.
        source: bincode::Error,
    },

    /// Returned when the library file cannot be written.
    #[error("cannot write template library to {path}")]
    WriteLibrary {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the library file cannot be read.
    #[error("cannot read template library from {path}")]
    ReadLibrary {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when bincode decoding of a library file fails.
    #[error("failed to deserialize template library from {path}")]
    DeserializeLibrary {
        /// Path of the library file.
        path: PathBuf,
        /// Underlying bincode error.
        source: bincode::Error,
    },

    /// Returned when a library file was written with a different format version.
    #[error("incompatible library version in {path}: expected {expected}, found {found}")]
    IncompatibleLibraryVersion {
        /// Format version this build reads.
        expected: u32,
        /// Format version stored in the file.
        found: u32,
        /// Path of the library file.
        path: PathBuf,
    },

    /// Returned when a stored template fails sequence validation on load.
    #[error("template \"{label}\" in {path} is not a valid sequence")]
    CorruptTemplate {
        /// Label of the stored template.
        label: String,
        /// Path of the library file.
        path: PathBuf,
        /// Validation error.
        #[source]
        source: AlignError,
    },
}

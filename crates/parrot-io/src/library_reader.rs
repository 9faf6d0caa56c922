//! Loads a labeled set of feature files from one directory.

use std::path::{Path, PathBuf};

use parrot_recog::{Label, TemplateLibrary};
use tracing::{info, instrument, warn};

use crate::IoError;
use crate::reader::SequenceReader;

/// Reads `{dir}/{label}{suffix}.csv` for every requested label.
///
/// Used both for reference templates and for test sets, which share the same
/// label-to-sequence shape. A missing file becomes an absent entry so that
/// recognition and evaluation can skip it; any other failure is an error.
#[derive(Debug, Clone)]
pub struct LibraryReader {
    dir: PathBuf,
    suffix: String,
    has_headers: bool,
}

impl LibraryReader {
    /// Create a reader for `dir` with an empty file-name suffix.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            suffix: String::new(),
            has_headers: false,
        }
    }

    /// Set the suffix appended to each label to form the file stem.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Skip a header row in every file.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Return the path read for `label`.
    #[must_use]
    pub fn path_for(&self, label: &Label) -> PathBuf {
        self.dir.join(format!("{}{}.csv", label.as_str(), self.suffix))
    }

    /// Read one entry per label.
    ///
    /// # Errors
    ///
    /// Any [`SequenceReader`] error except a missing file, which yields an
    /// absent entry.
    #[instrument(skip_all, fields(dir = %self.dir.display(), suffix = %self.suffix, n_labels = labels.len()))]
    pub fn read(&self, labels: &[Label]) -> Result<TemplateLibrary, IoError> {
        let mut library = TemplateLibrary::new();

        for label in labels {
            let path = self.path_for(label);
            if !path.is_file() {
                warn!(label = label.as_str(), path = %path.display(), "feature file missing");
                library.insert_missing(label.clone());
                continue;
            }
            let sequence = SequenceReader::new(&path)
                .with_headers(self.has_headers)
                .read()?;
            library.insert(label.clone(), sequence);
        }

        info!(
            n_labels = library.len(),
            n_present = library.n_present(),
            "feature set loaded"
        );
        Ok(library)
    }
}

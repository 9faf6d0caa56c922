//! Template library persistence via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use parrot_dtw::Sequence;

use crate::error::RecogError;
use crate::library::TemplateLibrary;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for a serialized library.
#[derive(serde::Serialize, serde::Deserialize)]
struct LibraryEnvelope {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Entries in label order.
    templates: Vec<StoredTemplate>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredTemplate {
    label: String,
    dim: usize,
    /// Row-major frame values; `None` for an absent entry.
    values: Option<Vec<f64>>,
}

impl TemplateLibrary {
    /// Save the library to a binary file.
    ///
    /// Absent entries are stored as absent and survive a round trip.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RecogError::SerializeLibrary`] | bincode encoding failed |
    /// | [`RecogError::WriteLibrary`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecogError> {
        let path = path.as_ref();

        let templates = self
            .iter()
            .map(|(label, template)| StoredTemplate {
                label: label.to_string(),
                dim: template.map_or(0, Sequence::dim),
                values: template.map(|t| t.as_flat().to_vec()),
            })
            .collect();
        let envelope = LibraryEnvelope {
            format_version: FORMAT_VERSION,
            templates,
        };

        let bytes = bincode::serialize(&envelope)
            .map_err(|e| RecogError::SerializeLibrary { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| RecogError::WriteLibrary {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(
            size_bytes = bytes.len(),
            n_labels = self.len(),
            n_present = self.n_present(),
            "template library saved"
        );

        Ok(())
    }

    /// Load a library from a binary file written by [`TemplateLibrary::save`].
    ///
    /// Every stored template is validated again as a [`Sequence`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RecogError::ReadLibrary`] | file read failed |
    /// | [`RecogError::DeserializeLibrary`] | bincode decoding failed |
    /// | [`RecogError::IncompatibleLibraryVersion`] | format version mismatch |
    /// | [`RecogError::CorruptTemplate`] | a stored template is not a valid sequence |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecogError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| RecogError::ReadLibrary {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: LibraryEnvelope =
            bincode::deserialize(&bytes).map_err(|e| RecogError::DeserializeLibrary {
                path: path.to_path_buf(),
                source: e,
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(RecogError::IncompatibleLibraryVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        let mut library = TemplateLibrary::new();
        for stored in envelope.templates {
            let template = stored
                .values
                .map(|values| Sequence::from_flat(values, stored.dim))
                .transpose()
                .map_err(|e| RecogError::CorruptTemplate {
                    label: stored.label.clone(),
                    path: path.to_path_buf(),
                    source: e,
                })?;
            library.insert_entry(stored.label, template);
        }

        debug!(
            n_labels = library.len(),
            n_present = library.n_present(),
            "template library loaded"
        );

        Ok(library)
    }
}

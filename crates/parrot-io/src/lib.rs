//! Feature-file reading, validation, and result artifacts for the parrot pipeline.

mod domain;
mod error;
mod library_reader;
mod reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use library_reader::LibraryReader;
pub use reader::SequenceReader;
pub use writer::ResultWriter;

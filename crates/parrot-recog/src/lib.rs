//! Template-matching recognition on top of dynamic time warping.
//!
//! Holds a labeled library of reference sequences, recognizes a query as the
//! label of its nearest template, evaluates accuracy over labeled test sets,
//! and persists libraries with bincode.

mod config;
mod confusion;
mod error;
mod eval;
mod label;
mod library;
mod recognize;
mod serialize;

pub use config::RecognizerConfig;
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::RecogError;
pub use eval::Evaluation;
pub use label::Label;
pub use library::TemplateLibrary;
pub use recognize::{Recognition, Recognizer, TemplateScore};

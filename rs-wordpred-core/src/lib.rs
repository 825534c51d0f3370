//! N-gram next-word prediction library.
//!
//! This crate provides a word-level n-gram prediction system including:
//! - Lowercase alphabetic tokenization of free-form text
//! - Bigram and trigram frequency tables built from a corpus
//! - Sequential and sharded-parallel corpus ingestion
//! - Tiered prediction falling back from trigram to bigram to unigram context
//!
//! Interactive prompting and result rendering live in the binaries that
//! depend on this crate.

/// Tokenizer, n-gram tables, ingestion and prediction.
pub mod model;

/// Corpus I/O helpers (line streaming, folder listing, path helpers).
pub mod io;

/// Corpus loading failures.
pub mod error;

pub use error::CorpusError;
pub use model::prediction::{PredictionRequest, Predictions, Tier};
pub use model::predictor::NextWordPredictor;

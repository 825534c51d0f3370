//! Word-level n-gram model.
//!
//! - Tokenization of raw text (`tokenizer`)
//! - Per-context continuation counts (`Continuations`)
//! - Bigram / trigram tables (`NGramTable`)
//! - Corpus ingestion, sequential and sharded (`CorpusIngestor`)
//! - Tiered next-word prediction (`NextWordPredictor`)

/// Lowercase alphabetic tokenization.
pub mod tokenizer;

/// Counts of the words observed after a single context.
///
/// Supports prefix-filtered conditional frequencies and merging.
pub mod continuations;

/// Two-level frequency tables keyed by a one- or two-word context.
pub mod ngram_table;

/// Sliding-window corpus ingestion.
///
/// Builds bigram and trigram tables from a stream of lines, either on the
/// calling thread or sharded across worker threads.
pub mod ingestor;

/// Prediction results and normalized requests.
pub mod prediction;

/// Tiered next-word predictor (trigram → bigram → unigram).
pub mod predictor;

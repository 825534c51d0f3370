use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading a corpus.
///
/// Both variants are recoverable: the model keeps whatever tables it had
/// (possibly empty, possibly partially filled) and keeps serving predictions.
/// An empty candidate set is never an error, it is an empty `Predictions`.
#[derive(Error, Debug)]
pub enum CorpusError {
	/// The corpus source could not be opened.
	#[error("corpus '{}' is unavailable: {source}", .path.display())]
	Unavailable {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The corpus was opened but reading failed part-way through.
	/// Counts ingested before the failure are kept.
	#[error("failed to read corpus '{}': {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl CorpusError {
	/// Path of the corpus that failed.
	pub fn path(&self) -> &PathBuf {
		match self {
			CorpusError::Unavailable { path, .. } | CorpusError::Read { path, .. } => path,
		}
	}

	/// True when the corpus could not be opened at all.
	pub fn is_unavailable(&self) -> bool {
		matches!(self, CorpusError::Unavailable { .. })
	}
}

use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::error::CorpusError;
use crate::io::read_lines;

use super::ingestor::{CorpusIngestor, NGramCounts, ingest, ingest_parallel};
use super::ngram_table::{BigramTable, TrigramKey, TrigramTable};
use super::prediction::{PredictionRequest, Predictions, Tier};

/// Word-level n-gram model suggesting the next word of a sentence.
///
/// Holds a bigram and a trigram frequency table. The keys of the bigram
/// table are the model's vocabulary.
///
/// # Responsibilities
/// - Build its tables from one or more corpora
/// - Predict the next word from a prefix and up to two context words,
///   falling back from trigram to bigram to unigram context
/// - Merge with another model by summing counts
///
/// # Invariants
/// - Prediction never mutates the tables
/// - All counts are >= 1
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NextWordPredictor {
	bigrams: BigramTable,
	trigrams: TrigramTable,
}

impl NextWordPredictor {
	/// Creates an empty model. Every prediction on it is empty.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a model from in-memory lines of text.
	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::from_counts(ingest(lines))
	}

	/// Wraps already ingested tables.
	pub fn from_counts(counts: NGramCounts) -> Self {
		Self {
			bigrams: counts.bigrams,
			trigrams: counts.trigrams,
		}
	}

	/// Streams a corpus file into the model.
	///
	/// Counts are added to the existing tables. The sliding window starts
	/// empty for each corpus.
	///
	/// # Errors
	/// - `CorpusError::Unavailable` if the file cannot be opened; the model
	///   is left untouched.
	/// - `CorpusError::Read` if reading fails part-way; counts ingested
	///   before the failure are kept.
	pub fn load_corpus<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CorpusError> {
		let path = path.as_ref();
		log::info!("Processing corpus for n-grams: {}", path.display());

		let lines = read_lines(path).map_err(|source| unavailable(path, source))?;

		let mut ingestor = CorpusIngestor::new();
		let result = ingestor.feed_lines(lines);
		self.absorb(&ingestor.finish());

		match result {
			Ok(()) => {
				log::info!("N-gram processing completed: {} known words", self.vocabulary_size());
				Ok(())
			}
			Err(source) => Err(CorpusError::Read { path: path.to_owned(), source }),
		}
	}

	/// Same contract as [`load_corpus`](Self::load_corpus), counting on
	/// multiple threads.
	///
	/// Lines are read up to the first read error; the lines read so far are
	/// counted before `CorpusError::Read` is returned.
	pub fn load_corpus_parallel<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CorpusError> {
		let path = path.as_ref();
		log::info!("Processing corpus for n-grams in parallel: {}", path.display());

		let mut read_error = None;
		let mut lines = Vec::new();
		for line in read_lines(path).map_err(|source| unavailable(path, source))? {
			match line {
				Ok(line) => lines.push(line),
				Err(source) => {
					read_error = Some(source);
					break;
				}
			}
		}

		self.absorb(&ingest_parallel(&lines));

		match read_error {
			None => {
				log::info!("N-gram processing completed: {} known words", self.vocabulary_size());
				Ok(())
			}
			Some(source) => Err(CorpusError::Read { path: path.to_owned(), source }),
		}
	}

	/// Merges another model into this one by summing counts.
	pub fn merge(&mut self, other: &Self) {
		self.bigrams.merge(&other.bigrams);
		self.trigrams.merge(&other.trigrams);
	}

	fn absorb(&mut self, counts: &NGramCounts) {
		self.bigrams.merge(&counts.bigrams);
		self.trigrams.merge(&counts.trigrams);
	}

	/// Predicts the next word.
	///
	/// # Parameters
	/// - `prefix`: partial spelling of the next word, `""` matches anything.
	/// - `last_word`: word right before the one being typed.
	/// - `second_last_word`: word before `last_word`.
	///
	/// # Behavior
	/// Tries each tier in order and returns the first non-empty one:
	/// 1. Trigram, if both context words are given.
	/// 2. Bigram, if `last_word` is given.
	/// 3. Unigram: every known word starting with `prefix`, scored 1.0.
	///
	/// Empty context words count as absent. An unknown context is not an
	/// error, it just yields no candidates at that tier.
	pub fn predict(&self, prefix: &str, last_word: Option<&str>, second_last_word: Option<&str>) -> Predictions {
		let last_word = last_word.filter(|w| !w.is_empty());
		let second_last_word = second_last_word.filter(|w| !w.is_empty());

		if let (Some(second_last), Some(last)) = (second_last_word, last_word) {
			let scores = self.trigram_scores(prefix, second_last, last);
			if !scores.is_empty() {
				return Predictions::new(Tier::Trigram, scores);
			}
			log::debug!("No trigram predictions for prefix '{}' after '{} {}'", prefix, second_last, last);
		}

		if let Some(last) = last_word {
			let scores = self.bigram_scores(prefix, last);
			if !scores.is_empty() {
				return Predictions::new(Tier::Bigram, scores);
			}
			log::debug!("No bigram predictions for prefix '{}' after '{}'", prefix, last);
		}

		let scores = self.unigram_scores(prefix);
		if scores.is_empty() {
			log::debug!("No predictions available for prefix '{}'", prefix);
		}
		Predictions::new(Tier::Unigram, scores)
	}

	/// Predicts from a normalized [`PredictionRequest`].
	pub fn predict_request(&self, request: &PredictionRequest) -> Predictions {
		self.predict(&request.prefix, request.last_word.as_deref(), request.second_last_word.as_deref())
	}

	fn trigram_scores(&self, prefix: &str, second_last_word: &str, last_word: &str) -> HashMap<String, f64> {
		self.trigrams
			.get(&TrigramKey::new(second_last_word, last_word))
			.map(|continuations| continuations.scores(prefix))
			.unwrap_or_default()
	}

	fn bigram_scores(&self, prefix: &str, last_word: &str) -> HashMap<String, f64> {
		self.bigrams
			.get(&last_word.to_owned())
			.map(|continuations| continuations.scores(prefix))
			.unwrap_or_default()
	}

	fn unigram_scores(&self, prefix: &str) -> HashMap<String, f64> {
		self.vocabulary()
			.filter(|word| word.starts_with(prefix))
			.map(|word| (word.to_owned(), 1.0))
			.collect()
	}

	/// Bigram table: previous word → following words.
	pub fn bigrams(&self) -> &BigramTable {
		&self.bigrams
	}

	/// Trigram table: (second previous, previous) → following words.
	pub fn trigrams(&self) -> &TrigramTable {
		&self.trigrams
	}

	/// Known words, in no particular order.
	///
	/// A word is known once it has been seen followed by another word.
	pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
		self.bigrams.contexts().map(String::as_str)
	}

	pub fn is_known(&self, word: &str) -> bool {
		self.bigrams.contains(&word.to_owned())
	}

	pub fn vocabulary_size(&self) -> usize {
		self.bigrams.len()
	}

	/// True until a corpus with at least two tokens has been ingested.
	pub fn is_empty(&self) -> bool {
		self.bigrams.is_empty()
	}
}

fn unavailable(path: &Path, source: io::Error) -> CorpusError {
	CorpusError::Unavailable { path: path.to_owned(), source }
}

#[cfg(test)]
mod tests {
	use super::*;

	const CORPUS: &str = "the cat sat on the mat the cat ran";

	fn model() -> NextWordPredictor {
		NextWordPredictor::from_lines([CORPUS])
	}

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn bigram_prefix_keeps_unfiltered_denominator() {
		let predictions = model().predict("c", Some("the"), None);
		assert_eq!(predictions.tier(), Tier::Bigram);
		assert_eq!(predictions.len(), 1);
		assert!(approx(predictions.get("cat").unwrap(), 2.0 / 3.0));
	}

	#[test]
	fn unigram_is_a_membership_filter() {
		let predictions = model().predict("s", None, None);
		assert_eq!(predictions.tier(), Tier::Unigram);
		assert_eq!(predictions.scores(), &HashMap::from([("sat".to_owned(), 1.0)]));
	}

	#[test]
	fn trigram_wins_when_it_matches() {
		let predictions = model().predict("", Some("cat"), Some("the"));
		assert_eq!(predictions.tier(), Tier::Trigram);
		assert!(approx(predictions.get("sat").unwrap(), 0.5));
		assert!(approx(predictions.get("ran").unwrap(), 0.5));
		assert_eq!(predictions.len(), 2);
	}

	#[test]
	fn trigram_miss_falls_back_to_bigram() {
		// ("on", "the") only continues with "mat"
		let predictions = model().predict("c", Some("the"), Some("on"));
		assert_eq!(predictions.tier(), Tier::Bigram);
		assert!(approx(predictions.get("cat").unwrap(), 2.0 / 3.0));
	}

	#[test]
	fn unknown_context_falls_back_to_unigram() {
		let predictions = model().predict("m", Some("zebra"), Some("wild"));
		assert_eq!(predictions.tier(), Tier::Unigram);
		assert_eq!(predictions.get("mat"), Some(1.0));
		assert_eq!(predictions.len(), 1);
	}

	#[test]
	fn second_word_alone_is_ignored() {
		let predictions = model().predict("s", None, Some("the"));
		assert_eq!(predictions.tier(), Tier::Unigram);
		assert_eq!(predictions.get("sat"), Some(1.0));
	}

	#[test]
	fn empty_context_words_count_as_absent() {
		assert_eq!(model().predict("s", Some(""), Some("")), model().predict("s", None, None));
	}

	#[test]
	fn no_match_anywhere_is_empty() {
		let predictions = model().predict("xyz", Some("the"), Some("on"));
		assert!(predictions.is_empty());
		assert_eq!(predictions.tier(), Tier::Unigram);
	}

	#[test]
	fn prediction_does_not_grow_vocabulary() {
		let model = model();
		let before = model.clone();
		model.predict("", Some("unknown"), Some("words"));
		assert_eq!(model, before);
		assert!(!model.is_known("unknown"));
	}

	#[test]
	fn empty_model_predicts_nothing() {
		let model = NextWordPredictor::new();
		assert!(model.is_empty());
		assert!(model.predict("", None, None).is_empty());
		assert!(model.predict("a", Some("b"), Some("c")).is_empty());
	}

	#[test]
	fn vocabulary_is_bigram_contexts() {
		let model = model();
		let mut vocabulary: Vec<&str> = model.vocabulary().collect();
		vocabulary.sort();
		assert_eq!(vocabulary, vec!["cat", "mat", "on", "sat", "the"]);
		assert_eq!(model.vocabulary_size(), 5);
	}

	#[test]
	fn request_is_normalized_before_predicting() {
		let request = PredictionRequest::new("C", " The ", "");
		assert_eq!(model().predict_request(&request), model().predict("c", Some("the"), None));
	}

	#[test]
	fn merge_sums_models() {
		let mut merged = model();
		merged.merge(&model());
		let predictions = merged.predict("", Some("the"), None);
		assert!(approx(predictions.get("cat").unwrap(), 2.0 / 3.0));
		assert_eq!(merged.bigrams().get(&"the".to_owned()).unwrap().count("cat"), 4);
	}
}

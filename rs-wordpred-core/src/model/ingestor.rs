use std::io;
use std::sync::mpsc;
use std::thread;

use super::ngram_table::{BigramTable, TrigramKey, TrigramTable};
use super::tokenizer::tokenize;

/// Number of shards per CPU used by [`ingest_parallel`].
const SHARD_FACTOR: usize = 8;

/// The two frequency tables produced by ingestion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NGramCounts {
	/// Previous word → following words.
	pub bigrams: BigramTable,
	/// (second previous, previous) → following words.
	pub trigrams: TrigramTable,
}

impl NGramCounts {
	/// Sums the counts of another set of tables into this one.
	pub fn merge(&mut self, other: &Self) {
		self.bigrams.merge(&other.bigrams);
		self.trigrams.merge(&other.trigrams);
	}

	pub fn is_empty(&self) -> bool {
		self.bigrams.is_empty() && self.trigrams.is_empty()
	}
}

/// Streams tokens into bigram and trigram tables.
///
/// Keeps a sliding window over the last two tokens. The window is never
/// reset between lines: the corpus is one continuous token stream.
#[derive(Debug, Default)]
pub struct CorpusIngestor {
	counts: NGramCounts,
	second_previous: Option<String>,
	previous: Option<String>,
}

impl CorpusIngestor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Tokenizes a line and feeds every token in order.
	pub fn feed_line(&mut self, line: &str) {
		for token in tokenize(line) {
			self.feed_token(&token);
		}
	}

	/// Feeds fallible lines until the first read error.
	///
	/// Counts recorded before the error are kept.
	pub fn feed_lines<I>(&mut self, lines: I) -> io::Result<()>
	where
		I: IntoIterator<Item = io::Result<String>>,
	{
		for line in lines {
			self.feed_line(&line?);
		}
		Ok(())
	}

	/// Counts `word` against the current window, then shifts the window.
	pub fn feed_token(&mut self, word: &str) {
		if let Some(previous) = &self.previous {
			self.counts.bigrams.record(previous.clone(), word);

			if let Some(second_previous) = &self.second_previous {
				self.counts.trigrams.record(TrigramKey::new(second_previous, previous), word);
			}
		}
		self.prime(word);
	}

	/// Shifts `word` into the window without counting anything.
	///
	/// Used to give a shard the context that precedes it.
	pub fn prime(&mut self, word: &str) {
		self.second_previous = self.previous.take();
		self.previous = Some(word.to_owned());
	}

	/// Tables accumulated so far.
	pub fn counts(&self) -> &NGramCounts {
		&self.counts
	}

	/// Consumes the ingestor and returns its tables.
	pub fn finish(self) -> NGramCounts {
		self.counts
	}
}

/// Ingests a sequence of lines sequentially.
pub fn ingest<I, S>(lines: I) -> NGramCounts
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut ingestor = CorpusIngestor::new();
	for line in lines {
		ingestor.feed_line(line.as_ref());
	}
	ingestor.finish()
}

/// Ingests a sequence of lines using one thread per shard.
///
/// # Behavior
/// - Tokenizes all lines into one continuous token stream.
/// - Splits the stream into shards (based on CPU cores * factor).
/// - Primes each shard with the two tokens preceding it, so every
///   window is counted by exactly one shard.
/// - Merges partial tables by summing counts.
///
/// # Notes
/// - The result is identical to [`ingest`] on the same lines.
/// - Uses MPSC channels to collect partial tables from threads.
pub fn ingest_parallel<S: AsRef<str>>(lines: &[S]) -> NGramCounts {
	let tokens: Vec<String> = lines.iter().flat_map(|line| tokenize(line.as_ref())).collect();
	if tokens.is_empty() {
		return NGramCounts::default();
	}

	let shards = num_cpus::get() * SHARD_FACTOR;
	let shard_size = tokens.len().div_ceil(shards);
	log::debug!("Ingesting {} tokens in shards of {}", tokens.len(), shard_size);

	thread::scope(|scope| {
		let (tx, rx) = mpsc::channel();
		for start in (0..tokens.len()).step_by(shard_size) {
			let end = (start + shard_size).min(tokens.len());
			let primers = &tokens[start.saturating_sub(2)..start];
			let shard = &tokens[start..end];
			let tx = tx.clone();

			scope.spawn(move || {
				let mut ingestor = CorpusIngestor::new();
				for word in primers {
					ingestor.prime(word);
				}
				for word in shard {
					ingestor.feed_token(word);
				}
				tx.send(ingestor.finish()).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut counts = NGramCounts::default();
		for partial in rx.iter() {
			counts.merge(&partial);
		}
		counts
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bigram(counts: &NGramCounts, previous: &str, word: &str) -> usize {
		counts.bigrams.get(&previous.to_owned()).map_or(0, |c| c.count(word))
	}

	fn trigram(counts: &NGramCounts, second: &str, previous: &str, word: &str) -> usize {
		counts.trigrams.get(&TrigramKey::new(second, previous)).map_or(0, |c| c.count(word))
	}

	#[test]
	fn counts_bigrams_and_trigrams() {
		let counts = ingest(["the cat sat on the mat the cat ran"]);

		assert_eq!(bigram(&counts, "the", "cat"), 2);
		assert_eq!(bigram(&counts, "the", "mat"), 1);
		assert_eq!(counts.bigrams.get(&"the".to_owned()).unwrap().total(), 3);
		assert_eq!(trigram(&counts, "the", "cat", "sat"), 1);
		assert_eq!(trigram(&counts, "the", "cat", "ran"), 1);
		// "ran" is last, it never precedes anything
		assert!(!counts.bigrams.contains(&"ran".to_owned()));
	}

	#[test]
	fn window_spans_line_breaks() {
		let counts = ingest(["the cat", "sat down"]);
		assert_eq!(bigram(&counts, "cat", "sat"), 1);
		assert_eq!(trigram(&counts, "the", "cat", "sat"), 1);
		assert_eq!(trigram(&counts, "cat", "sat", "down"), 1);
	}

	#[test]
	fn blank_lines_do_not_reset_context() {
		let counts = ingest(["hello", "", "!!!", "world"]);
		assert_eq!(bigram(&counts, "hello", "world"), 1);
	}

	#[test]
	fn single_token_produces_nothing() {
		assert!(ingest(["alone"]).is_empty());
		assert!(ingest(Vec::<String>::new()).is_empty());
	}

	#[test]
	fn prime_sets_context_without_counting() {
		let mut ingestor = CorpusIngestor::new();
		ingestor.prime("the");
		ingestor.prime("cat");
		assert!(ingestor.counts().is_empty());

		ingestor.feed_token("sat");
		let counts = ingestor.finish();
		assert_eq!(bigram(&counts, "cat", "sat"), 1);
		assert_eq!(trigram(&counts, "the", "cat", "sat"), 1);
		assert!(!counts.bigrams.contains(&"the".to_owned()));
	}

	#[test]
	fn feed_lines_keeps_counts_before_error() {
		let lines = vec![
			Ok("one two".to_owned()),
			Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes")),
			Ok("three four".to_owned()),
		];
		let mut ingestor = CorpusIngestor::new();
		assert!(ingestor.feed_lines(lines).is_err());

		let counts = ingestor.finish();
		assert_eq!(bigram(&counts, "one", "two"), 1);
		assert!(!counts.bigrams.contains(&"two".to_owned()));
	}

	#[test]
	fn parallel_matches_sequential() {
		let lines: Vec<String> = (0..200)
			.map(|i| format!("the cat number {} sat on the mat while the dog ran", i % 7))
			.collect();
		assert_eq!(ingest_parallel(&lines), ingest(&lines));
	}

	#[test]
	fn parallel_handles_tiny_corpora() {
		assert_eq!(ingest_parallel(&["a b"]), ingest(["a b"]));
		assert!(ingest_parallel::<&str>(&[]).is_empty());
	}

	#[test]
	fn merge_is_order_independent() {
		let a = ingest(["the cat sat"]);
		let b = ingest(["the cat ran the end"]);

		let mut ab = a.clone();
		ab.merge(&b);
		let mut ba = b.clone();
		ba.merge(&a);
		assert_eq!(ab, ba);
		assert_eq!(bigram(&ab, "the", "cat"), 2);
	}
}

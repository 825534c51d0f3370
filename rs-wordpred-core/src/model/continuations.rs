use std::collections::HashMap;

/// Observed continuations of a single n-gram context.
///
/// A `Continuations` is the inner level of an n-gram table: for one context
/// (one preceding word, or an ordered pair of preceding words) it records how
/// many times each following word was observed.
///
/// ## Responsibilities:
/// - Accumulate occurrences during ingestion
/// - Turn counts into conditional frequencies, filtered by a prefix
/// - Merge with the continuations of the same context from another shard
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - No key is the empty string
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Continuations {
	/// Occurrence count indexed by the following word.
	/// Example: { "cat" => 2, "mat" => 1 }
	counts: HashMap<String, usize>,
}

impl Continuations {
	/// Creates an empty set of continuations.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `word` following this context.
	///
	/// - If the word was already seen, its count is increased.
	/// - Otherwise, it is inserted with a count of 1.
	pub fn add(&mut self, word: &str) {
		debug_assert!(!word.is_empty(), "continuations never store empty words");
		match self.counts.get_mut(word) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(word.to_owned(), 1);
			}
		}
	}

	/// Number of times `word` followed this context (0 if never).
	pub fn count(&self, word: &str) -> usize {
		self.counts.get(word).copied().unwrap_or(0)
	}

	/// Total number of observations of this context.
	pub fn total(&self) -> usize {
		self.counts.values().sum()
	}

	/// Number of distinct following words.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(word, count)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(word, count)| (word.as_str(), *count))
	}

	/// Conditional frequency of every continuation starting with `prefix`.
	///
	/// Each count is divided by the total over *all* continuations, and only
	/// then filtered by prefix: the returned scores sum to 1.0 for an empty
	/// prefix and to less than that otherwise.
	///
	/// Returns an empty map when nothing matches.
	pub fn scores(&self, prefix: &str) -> HashMap<String, f64> {
		let total = self.total();
		if total == 0 {
			return HashMap::new();
		}

		self.counts
			.iter()
			.filter(|(word, _)| word.starts_with(prefix))
			.map(|(word, count)| (word.clone(), *count as f64 / total as f64))
			.collect()
	}

	/// Merges the continuations of the same context observed elsewhere.
	///
	/// Occurrence counts are summed, so merging is commutative and associative.
	pub fn merge(&mut self, other: &Self) {
		for (word, count) in &other.counts {
			*self.counts.entry(word.clone()).or_insert(0) += *count;
		}
	}
}

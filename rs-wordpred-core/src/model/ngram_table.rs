use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::continuations::Continuations;

/// Ordered pair of preceding words used as a trigram context.
///
/// `("the", "cat")` and `("cat", "the")` are distinct keys, and words are
/// never concatenated, so no separator can collide with a word.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrigramKey {
	/// Word two positions before the predicted one.
	pub second_previous: String,
	/// Word immediately before the predicted one.
	pub previous: String,
}

impl TrigramKey {
	pub fn new(second_previous: &str, previous: &str) -> Self {
		Self {
			second_previous: second_previous.to_owned(),
			previous: previous.to_owned(),
		}
	}
}

impl fmt::Display for TrigramKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.second_previous, self.previous)
	}
}

/// Frequency table mapping an n-gram context to its observed continuations.
///
/// The outer level is keyed by the context (`K`), the inner level is a
/// [`Continuations`] counting the words that followed it.
///
/// # Responsibilities
/// - Record `(context, next word)` observations during ingestion
/// - Give read-only access to the continuations of a context
/// - Merge with a table of the same order built from another shard
///
/// # Invariants
/// - A context is present only once at least one continuation was recorded
/// - Lookups never create contexts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NGramTable<K: Eq + Hash> {
	/// Mapping from a context to the words observed after it
	contexts: HashMap<K, Continuations>,
}

/// Single preceding word → following words.
pub type BigramTable = NGramTable<String>;

/// Ordered pair of preceding words → following words.
pub type TrigramTable = NGramTable<TrigramKey>;

impl<K: Eq + Hash> Default for NGramTable<K> {
	fn default() -> Self {
		Self { contexts: HashMap::new() }
	}
}

impl<K: Eq + Hash + Clone> NGramTable<K> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `word` following `context`.
	///
	/// The continuations of `context` are created empty on first insert.
	pub fn record(&mut self, context: K, word: &str) {
		let continuations = self.contexts.entry(context).or_insert_with(Continuations::new);
		continuations.add(word);
	}

	/// Continuations of `context`, or `None` if it was never observed.
	pub fn get(&self, context: &K) -> Option<&Continuations> {
		self.contexts.get(context)
	}

	/// Returns true if `context` was observed at least once.
	pub fn contains(&self, context: &K) -> bool {
		self.contexts.contains_key(context)
	}

	/// Iterates over every observed context, in no particular order.
	pub fn contexts(&self) -> impl Iterator<Item = &K> {
		self.contexts.keys()
	}

	/// Iterates over `(context, continuations)` pairs, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &Continuations)> {
		self.contexts.iter()
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Merges another table of the same order into this one.
	///
	/// Matching contexts have their continuation counts summed, missing ones
	/// are cloned.
	pub fn merge(&mut self, other: &Self) {
		for (context, continuations) in &other.contexts {
			if let Some(existing) = self.contexts.get_mut(context) {
				existing.merge(continuations);
			} else {
				self.contexts.insert(context.clone(), continuations.clone());
			}
		}
	}
}

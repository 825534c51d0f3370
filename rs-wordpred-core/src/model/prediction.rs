use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tokenizer::normalize_word;

/// Context level a set of predictions was produced at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
	/// Two preceding words.
	Trigram,
	/// One preceding word.
	Bigram,
	/// No context: vocabulary membership only.
	Unigram,
}

/// Candidate next words with their relevance score.
///
/// For the trigram and bigram tiers a score is the conditional frequency of
/// the word after its context, computed before prefix filtering. For the
/// unigram tier every candidate scores `1.0`.
///
/// An empty `Predictions` means no tier produced a match. This is a normal
/// outcome, the caller decides how to surface it.
#[derive(Clone, Debug, PartialEq)]
pub struct Predictions {
	tier: Tier,
	scores: HashMap<String, f64>,
}

impl Predictions {
	pub(crate) fn new(tier: Tier, scores: HashMap<String, f64>) -> Self {
		Self { tier, scores }
	}

	/// Tier that produced these predictions (the last tier tried if empty).
	pub fn tier(&self) -> Tier {
		self.tier
	}

	/// Score of each candidate word.
	pub fn scores(&self) -> &HashMap<String, f64> {
		&self.scores
	}

	/// Score of `word`, if it is a candidate.
	pub fn get(&self, word: &str) -> Option<f64> {
		self.scores.get(word).copied()
	}

	pub fn len(&self) -> usize {
		self.scores.len()
	}

	pub fn is_empty(&self) -> bool {
		self.scores.is_empty()
	}

	/// Candidates sorted by descending score, ties broken alphabetically.
	pub fn ranked(&self) -> Vec<(&str, f64)> {
		let mut ranked: Vec<(&str, f64)> = self.scores.iter().map(|(word, score)| (word.as_str(), *score)).collect();
		ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		ranked
	}
}

/// A normalized prediction request.
///
/// - `prefix` is the partial spelling of the next word (may be empty)
/// - `last_word` is the word just before it, if any
/// - `second_last_word` is the word before `last_word`, if any
///
/// # Invariants
/// - All fields are trimmed and lowercased
/// - Context words are never empty strings: blank means `None`
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PredictionRequest {
	#[serde(default)]
	pub prefix: String,
	#[serde(default)]
	pub last_word: Option<String>,
	#[serde(default)]
	pub second_last_word: Option<String>,
}

impl PredictionRequest {
	/// Builds a request from raw user input.
	pub fn new(prefix: &str, last_word: &str, second_last_word: &str) -> Self {
		Self {
			prefix: normalize_word(prefix).unwrap_or_default(),
			last_word: normalize_word(last_word),
			second_last_word: normalize_word(second_last_word),
		}
	}

	/// Re-applies normalization, e.g. after deserializing from a query string.
	pub fn normalized(self) -> Self {
		Self::new(
			&self.prefix,
			self.last_word.as_deref().unwrap_or_default(),
			self.second_last_word.as_deref().unwrap_or_default(),
		)
	}
}

/// Splits a line of free-form text into lowercase alphabetic tokens.
///
/// The whole line is lowercased first, then every character that is neither
/// an ASCII letter nor whitespace is removed, and what remains is split on
/// whitespace. Punctuation inside a word joins its halves (`"don't"` becomes
/// `"dont"`), and empty tokens never appear.
pub fn tokenize(line: &str) -> Vec<String> {
	let cleaned: String = line
		.to_lowercase()
		.chars()
		.filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
		.collect();

	cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Normalizes a user-supplied word or prefix: trimmed and lowercased.
///
/// Returns `None` for an empty input, which callers treat as "absent".
pub fn normalize_word(input: &str) -> Option<String> {
	let word = input.trim().to_lowercase();
	if word.is_empty() { None } else { Some(word) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_punctuation_and_digits() {
		assert_eq!(tokenize("The cat, sat; on 2 mats!"), vec!["the", "cat", "sat", "on", "mats"]);
	}

	#[test]
	fn punctuation_inside_a_word_joins_it() {
		assert_eq!(tokenize("Don't stop-now"), vec!["dont", "stopnow"]);
	}

	#[test]
	fn blank_and_symbol_only_lines_yield_nothing() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("   \t ").is_empty());
		assert!(tokenize("42 -- !!").is_empty());
	}

	#[test]
	fn non_ascii_letters_are_dropped() {
		assert_eq!(tokenize("café naïve"), vec!["caf", "nave"]);
	}

	#[test]
	fn normalize_word_treats_blank_as_absent() {
		assert_eq!(normalize_word("  The "), Some("the".to_owned()));
		assert_eq!(normalize_word("   "), None);
		assert_eq!(normalize_word(""), None);
	}
}

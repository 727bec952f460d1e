use std::collections::BTreeMap;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::{lexicon, matcher, script};

pub const DEFAULT_SHORT_QUERY_MAX_TOKENS: usize = 2;

/// Punctuation that may wrap a symbol-bearing term inside a sentence.
const WRAPPING_PUNCTUATION: &[char] =
	&[',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '،', '؟', '؛'];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedQuery {
	pub original: String,
	pub text: String,
	pub tokens: Vec<String>,
	/// Tokens from the user's own words, before abbreviation expansion.
	pub typed_tokens: Vec<String>,
	/// Computed on the raw input, before any translation.
	pub is_arabic: bool,
	pub is_short: bool,
}

#[derive(Clone, Debug)]
pub struct QueryNormalizer {
	arabic_terms: Vec<(String, &'static str)>,
	abbreviations: BTreeMap<String, Vec<String>>,
	short_query_max_tokens: usize,
}
impl QueryNormalizer {
	/// Builds a normalizer from the static dictionaries plus an abbreviation map mined from the
	/// catalog. Mined entries override static ones.
	pub fn new(mined: &BTreeMap<String, String>) -> Self {
		let mut arabic_terms = lexicon::ARABIC_TERMS
			.iter()
			.map(|(arabic, english)| (fold(arabic), *english))
			.collect::<Vec<_>>();

		// Longest first so phrases win over the words they contain.
		arabic_terms.sort_by(|(a, _), (b, _)| b.chars().count().cmp(&a.chars().count()));

		let mut abbreviations = BTreeMap::new();

		for (abbr, expansion) in lexicon::STATIC_ABBREVIATIONS {
			abbreviations.insert(abbr.to_string(), split_expansion(expansion));
		}
		for (abbr, expansion) in mined {
			let abbr = abbr.trim().to_lowercase();
			let tokens = split_expansion(expansion);

			if abbr.is_empty() || tokens.is_empty() || is_spelled_out(&abbr, &tokens) {
				continue;
			}

			abbreviations.insert(abbr, tokens);
		}

		Self { arabic_terms, abbreviations, short_query_max_tokens: DEFAULT_SHORT_QUERY_MAX_TOKENS }
	}

	pub fn with_short_query_max_tokens(mut self, max_tokens: usize) -> Self {
		self.short_query_max_tokens = max_tokens;

		self
	}

	pub fn normalize(&self, raw: &str) -> NormalizedQuery {
		let is_arabic = script::contains_arabic(raw);
		let folded = fold(raw);
		let translated = self.translate(&folded);
		let expanded = self.expand_abbreviations(&translated);
		let typed_tokens = content_tokens(&translated);
		let tokens = content_tokens(&expanded);
		let is_short = tokens.len() <= self.short_query_max_tokens;

		NormalizedQuery {
			original: raw.to_string(),
			text: tokens.join(" "),
			tokens,
			typed_tokens,
			is_arabic,
			is_short,
		}
	}

	fn translate(&self, text: &str) -> String {
		let mut out = text.to_string();

		for (arabic, english) in &self.arabic_terms {
			if out.contains(arabic.as_str()) {
				out = out.replace(arabic.as_str(), &format!(" {english} "));
			}
		}

		out
	}

	fn expand_abbreviations(&self, text: &str) -> String {
		let words = text.split_whitespace().collect::<Vec<_>>();
		let mut out = Vec::with_capacity(words.len());

		for (idx, word) in words.iter().enumerate() {
			out.push((*word).to_string());

			let key = word.trim_matches(|ch: char| !matcher::is_word_char(ch));
			let Some(expansion) = self.abbreviations.get(key) else {
				continue;
			};
			let following = words[idx + 1..]
				.iter()
				.map(|word| word.trim_matches(|ch: char| !matcher::is_word_char(ch)))
				.filter(|word| !lexicon::is_query_stopword(word));

			if following.take(expansion.len()).eq(expansion.iter().map(String::as_str)) {
				continue;
			}

			out.extend(expansion.iter().cloned());
		}

		out.join(" ")
	}
}

impl Default for QueryNormalizer {
	fn default() -> Self {
		Self::new(&BTreeMap::new())
	}
}

/// NFKC, invisible-mark removal, alef folding and lowercasing. Dictionary keys go through the
/// same function so they compare equal to folded input.
pub fn fold(raw: &str) -> String {
	let composed = raw.nfkc().collect::<String>();

	script::strip_invisible(&composed)
		.chars()
		.map(|ch| match ch {
			'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
			other => other,
		})
		.collect::<String>()
		.to_lowercase()
}

/// Splits on whitespace and replaces every non-word character with a separator, except for
/// known symbol-bearing technical terms, which are kept whole.
fn strip_punctuation(text: &str) -> Vec<String> {
	let mut tokens = Vec::new();

	for word in text.split_whitespace() {
		if let Some(term) = symbol_term(word) {
			tokens.push(term.to_string());

			continue;
		}

		let cleaned = word
			.chars()
			.map(|ch| if matcher::is_word_char(ch) { ch } else { ' ' })
			.collect::<String>();

		tokens.extend(cleaned.split_whitespace().map(str::to_string));
	}

	tokens
}

fn symbol_term(word: &str) -> Option<&str> {
	let trimmed = word.trim_matches(WRAPPING_PUNCTUATION);

	if lexicon::is_symbol_term(trimmed) {
		return Some(trimmed);
	}

	let without_period = trimmed.trim_end_matches('.');

	lexicon::is_symbol_term(without_period).then_some(without_period)
}

/// Punctuation-stripped tokens without query stopwords.
fn content_tokens(text: &str) -> Vec<String> {
	strip_punctuation(text).into_iter().filter(|token| !lexicon::is_query_stopword(token)).collect()
}

/// Expansions are stored without stopwords so the already-expanded check sees what the
/// normalized text actually contains.
fn split_expansion(expansion: &str) -> Vec<String> {
	content_tokens(&fold(expansion))
}

/// `aws -> a w s` placeholders carry no extra meaning for a query.
fn is_spelled_out(abbr: &str, tokens: &[String]) -> bool {
	tokens.len() == abbr.chars().count()
		&& tokens.iter().zip(abbr.chars()).all(|(token, ch)| {
			let mut chars = token.chars();

			chars.next() == Some(ch) && chars.next().is_none()
		})
}

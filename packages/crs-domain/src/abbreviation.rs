use std::collections::BTreeMap;

use regex::Regex;

use crate::catalog::CatalogItem;

const PARENTHESIZED_ABBREVIATION: &str = r"\(([A-Za-z][A-Za-z0-9]{1,7})\)";

/// Mines `abbr -> expansion` pairs from catalog text.
///
/// An `(ABBR)` in a title or description counts when the N words right before it have initials
/// spelling ABBR, N being its length. Uppercase skill tokens that are not explained anywhere get a
/// spaced-letter placeholder. Keys are lowercase; the first occurrence wins.
pub fn mine_abbreviations(items: &[CatalogItem]) -> BTreeMap<String, String> {
	let mut map = BTreeMap::new();

	if let Ok(pattern) = Regex::new(PARENTHESIZED_ABBREVIATION) {
		for item in items {
			for text in [item.title.as_str(), item.description.as_str()] {
				for (abbr, expansion) in parenthesized(&pattern, text) {
					map.entry(abbr).or_insert(expansion);
				}
			}
		}
	}

	for item in items {
		for skill in &item.skills {
			for token in skill.split_whitespace() {
				let token = token.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());

				if !is_uppercase_abbreviation(token) {
					continue;
				}

				let abbr = token.to_lowercase();
				let placeholder =
					abbr.chars().map(String::from).collect::<Vec<_>>().join(" ");

				map.entry(abbr).or_insert(placeholder);
			}
		}
	}

	map
}

fn parenthesized(pattern: &Regex, text: &str) -> Vec<(String, String)> {
	let mut found = Vec::new();

	for captures in pattern.captures_iter(text) {
		let (Some(whole), Some(abbr)) = (captures.get(0), captures.get(1)) else {
			continue;
		};
		let abbr = abbr.as_str().to_lowercase();
		let needed = abbr.chars().count();
		let preceding = text[..whole.start()]
			.split_whitespace()
			.map(|word| word.trim_matches(|ch: char| !ch.is_alphanumeric()))
			.filter(|word| !word.is_empty())
			.collect::<Vec<_>>();

		if preceding.len() < needed {
			continue;
		}

		let words = &preceding[preceding.len() - needed..];
		let initials = words
			.iter()
			.filter_map(|word| word.chars().next())
			.flat_map(char::to_lowercase)
			.collect::<String>();

		if initials == abbr {
			found.push((abbr, words.join(" ").to_lowercase()));
		}
	}

	found
}

fn is_uppercase_abbreviation(token: &str) -> bool {
	let len = token.chars().count();

	(2..=8).contains(&len)
		&& token.chars().next().is_some_and(|ch| ch.is_ascii_uppercase())
		&& token.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
}

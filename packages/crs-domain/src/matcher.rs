//! Boundary-aware keyword matching.
//!
//! A keyword that starts with a word character needs a non-word character (or the start of
//! the text) in front of it. A keyword that starts with a symbol, such as `.net`, has no left
//! constraint. On the right, the character after the match must never be a word character,
//! which rejects `c#2` for `c#` and `node.jsx` for `node.js`.

pub fn is_word_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

/// Case-insensitive match of `keyword` inside `haystack` under the symbol-boundary rule.
pub fn keyword_matches(haystack: &str, keyword: &str) -> bool {
	let keyword = keyword.trim().to_lowercase();

	if keyword.is_empty() {
		return false;
	}

	let haystack = haystack.to_lowercase();

	matches_lowercased(&haystack, &keyword)
}

/// Same as [`keyword_matches`] for callers that already lowercased both sides.
pub fn matches_lowercased(haystack: &str, keyword: &str) -> bool {
	let Some(first) = keyword.chars().next() else {
		return false;
	};
	let needs_left_boundary = is_word_char(first);

	for (start, _) in haystack.match_indices(keyword) {
		let end = start + keyword.len();

		if needs_left_boundary && haystack[..start].chars().next_back().is_some_and(is_word_char) {
			continue;
		}
		if haystack[end..].chars().next().is_some_and(is_word_char) {
			continue;
		}

		return true;
	}

	false
}

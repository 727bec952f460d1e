use unicode_script::{Script, UnicodeScript};

pub fn contains_arabic(input: &str) -> bool {
	input.chars().any(|ch| !ch.is_ascii() && ch.script() == Script::Arabic)
}

/// Arabic short vowels (harakat), shadda and sukun.
pub fn is_arabic_diacritic(ch: char) -> bool {
	('\u{064B}'..='\u{0652}').contains(&ch)
}

pub fn is_tatweel(ch: char) -> bool {
	ch == '\u{0640}'
}

pub fn is_zero_width(ch: char) -> bool {
	matches!(
		ch,
		'\u{00AD}' // soft hyphen
			| '\u{034F}' // combining grapheme joiner
			| '\u{061C}' // arabic letter mark
			| '\u{200B}' // zero width space
			| '\u{200C}' // zero width non-joiner
			| '\u{200D}' // zero width joiner
			| '\u{200E}' // left-to-right mark
			| '\u{200F}' // right-to-left mark
			| '\u{2060}' // word joiner
			| '\u{FEFF}' // zero width no-break space
	)
}

/// Drops zero-width marks, Arabic diacritics and tatweel. Everything else passes through.
pub fn strip_invisible(input: &str) -> String {
	input
		.chars()
		.filter(|ch| !is_zero_width(*ch) && !is_arabic_diacritic(*ch) && !is_tatweel(*ch))
		.collect()
}

use regex::Regex;
use std::sync::LazyLock;

use kbret_core::types::normalize;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("static word regex"));

/// Normalize `query` the same way documents are normalized, then split it into
/// word tokens longer than one character. Duplicates are kept.
///
/// Single-character tokens ("a", "I", "5") are dropped, including meaningful
/// ones such as single-letter codes.
pub fn query_tokens(query: &str) -> Vec<String> {
    let normalized = normalize(query);
    WORD_RE
        .find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|tok| tok.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::query_tokens;

    #[test]
    fn drops_punctuation_and_single_chars() {
        assert!(query_tokens("??? a I").is_empty());
        assert_eq!(query_tokens("How do I reset my Password?"), vec!["how", "do", "reset", "my", "password"]);
    }

    #[test]
    fn keeps_unicode_words_and_repeats() {
        assert_eq!(query_tokens("Café café"), vec!["café", "café"]);
        assert_eq!(query_tokens("error_503 503"), vec!["error_503", "503"]);
    }
}

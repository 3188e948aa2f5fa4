//! Domain types shared by the document store, both scorers and the engine.

use serde::{Deserialize, Serialize};

/// One knowledge-base document, loaded from a single `.txt` file.
///
/// - `source`: file name, unique within the documents directory
/// - `raw_text`: full file contents (undecodable bytes dropped)
/// - `summary`: first non-blank line, trimmed; empty when the file is blank
/// - `normalized_text`: whitespace-collapsed, trimmed, lower-cased `raw_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: String,
    pub raw_text: String,
    pub summary: String,
    pub normalized_text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let summary = summary_line(&raw_text).to_string();
        let normalized_text = normalize(&raw_text);
        Self { source: source.into(), raw_text, summary, normalized_text }
    }

    pub fn meta(&self) -> DocMeta {
        DocMeta { source: self.source.clone(), summary: self.summary.clone() }
    }
}

/// Metadata row stored alongside each embedding vector.
///
/// Older metadata stores wrote the summary under `"text"`; both keys are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub source: String,
    #[serde(alias = "text", default)]
    pub summary: String,
}

/// Indicates which scorer produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Embedding,
    Keyword,
}

/// The record returned to callers of `retrieve`.
///
/// `score` is scorer-specific (cosine similarity or overlap count) but higher
/// is always better. Degenerate keyword results carry a score of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDoc {
    pub source: String,
    pub summary: String,
    pub score: f32,
    pub origin: SourceKind,
}

/// Collapse whitespace runs to a single space, trim, lower-case.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// First line that is not blank, trimmed. Empty when every line is blank.
///
/// Lines end at any Unicode line boundary, including a lone `\r`.
pub fn summary_line(text: &str) -> &str {
    text.split(is_line_boundary).map(str::trim).find(|line| !line.is_empty()).unwrap_or("")
}

fn is_line_boundary(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(normalize("  Reset\tYour\n\nPASSWORD  here "), "reset your password here");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn summary_skips_blank_lines() {
        assert_eq!(summary_line("\n   \n  First real line  \nsecond"), "First real line");
        assert_eq!(summary_line("   \n\t\n"), "");
        assert_eq!(summary_line(""), "");
    }

    #[test]
    fn summary_splits_on_every_line_boundary() {
        assert_eq!(summary_line("Title line\rSecond line\r"), "Title line");
        assert_eq!(summary_line("\r\n\r\nCRLF title\r\nbody"), "CRLF title");
        assert_eq!(summary_line("\x0c  Form feed\x0bvertical"), "Form feed");
        assert_eq!(summary_line("one\u{2028}two"), "one");
    }

    #[test]
    fn meta_accepts_legacy_text_key() {
        let m: DocMeta = serde_json::from_str(r#"{"source":"a.txt","text":"hello"}"#).expect("parse");
        assert_eq!(m.summary, "hello");
        let m: DocMeta = serde_json::from_str(r#"{"source":"a.txt","summary":"hi"}"#).expect("parse");
        assert_eq!(m.summary, "hi");
    }
}

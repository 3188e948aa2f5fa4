//! Token-overlap scoring used whenever the embedding path is unavailable.
//!
//! The score of a document is the number of times the query tokens occur as
//! substrings of its normalized text, plus one for every query token found in
//! its lower-cased file name. There is no length normalization and no term
//! weighting; the filename bonus counts the same as a body match.
use kbret_core::types::Document;

use crate::tokenize::query_tokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredDoc {
    /// Position of the document in the store snapshot.
    pub index: usize,
    pub score: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordScorer;

impl KeywordScorer {
    pub fn new() -> Self {
        Self
    }

    /// Rank `documents` against `query` and keep at most `k`.
    ///
    /// When the query has no usable tokens, or no document scores above zero,
    /// the first `k` documents in store order are returned with score 0 so a
    /// non-empty store always yields something.
    pub fn score(&self, query: &str, documents: &[Document], k: usize) -> Vec<ScoredDoc> {
        if k == 0 {
            return Vec::new();
        }
        let tokens = query_tokens(query);
        if tokens.is_empty() {
            tracing::debug!("query has no usable tokens; returning documents in store order");
            return leading(documents, k);
        }

        let mut scored: Vec<ScoredDoc> = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| ScoredDoc { index, score: document_score(&tokens, doc) })
            .filter(|s| s.score > 0)
            .collect();

        if scored.is_empty() {
            tracing::debug!(tokens = tokens.len(), "no keyword matches; returning documents in store order");
            return leading(documents, k);
        }
        // stable: equal scores keep store order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

/// Body occurrences of every token plus the filename bonus.
pub fn document_score(tokens: &[String], doc: &Document) -> usize {
    let body: usize = tokens.iter().map(|tok| doc.normalized_text.matches(tok.as_str()).count()).sum();
    let file_name = doc.source.to_lowercase();
    let bonus = tokens.iter().filter(|tok| file_name.contains(tok.as_str())).count();
    body + bonus
}

fn leading(documents: &[Document], k: usize) -> Vec<ScoredDoc> {
    (0..documents.len().min(k)).map(|index| ScoredDoc { index, score: 0 }).collect()
}

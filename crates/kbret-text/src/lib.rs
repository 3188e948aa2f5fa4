//! kbret-text
//!
//! Keyword fallback scorer: query tokenization and overlap scoring over the
//! document store snapshot. See `keyword` for the scoring rule.
pub mod keyword;
pub mod tokenize;

pub use keyword::{KeywordScorer, ScoredDoc};
pub use tokenize::query_tokens;

use std::fs;
use tempfile::TempDir;

use kbret_core::document_store::load_documents;
use kbret_core::Document;
use kbret_text::keyword::document_score;
use kbret_text::{query_tokens, KeywordScorer, ScoredDoc};

const SAMPLE_KB: &[(&str, &str)] = &[
    ("reset_password.txt", "To reset your password, go to Settings -> Account -> Reset Password. A reset link is sent to your registered email."),
    ("login_error.txt", "If login returns error 401, verify username/password. If using SSO, ensure your token is valid."),
    ("payment_failed.txt", "Payment failed errors occur due to expired card or insufficient funds."),
    ("app_crash_start.txt", "If the app crashes on start, try clearing cache and reinstalling."),
    ("two_factor.txt", "Two-factor sends a 6-digit code. If not received, request a new one."),
    ("password_policy.txt", "Passwords require 8 chars with letters and numbers."),
    ("error_503.txt", "503 happens during maintenance. Retry after a few minutes."),
];

fn sample_docs() -> (TempDir, Vec<Document>) {
    let tmp = TempDir::new().unwrap();
    for (name, text) in SAMPLE_KB {
        fs::write(tmp.path().join(name), text).unwrap();
    }
    let docs = load_documents(tmp.path());
    (tmp, docs)
}

fn sources<'a>(docs: &'a [Document], hits: &[ScoredDoc]) -> Vec<&'a str> {
    hits.iter().map(|h| docs[h.index].source.as_str()).collect()
}

#[test]
fn password_question_ranks_reset_password_first() {
    let (_tmp, docs) = sample_docs();
    let hits = KeywordScorer::new().score("How do I reset my password?", &docs, 3);
    assert_eq!(hits.len(), 3);
    assert_eq!(docs[hits[0].index].source, "reset_password.txt");
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score), "descending scores");
}

#[test]
fn end_to_end_two_documents() {
    let docs = vec![Document::new("a.txt", "reset your password here"), Document::new("b.txt", "login failed")];
    let hits = KeywordScorer::new().score("password", &docs, 1);
    assert_eq!(hits, vec![ScoredDoc { index: 0, score: 1 }]);
}

#[test]
fn punctuation_only_query_returns_store_order() {
    let (_tmp, docs) = sample_docs();
    let hits = KeywordScorer::new().score("??? a I", &docs, 3);
    assert_eq!(sources(&docs, &hits), vec!["app_crash_start.txt", "error_503.txt", "login_error.txt"]);
    assert!(hits.iter().all(|h| h.score == 0));
}

#[test]
fn no_match_returns_store_order() {
    let (_tmp, docs) = sample_docs();
    let hits = KeywordScorer::new().score("zebra giraffe", &docs, 2);
    assert_eq!(sources(&docs, &hits), vec!["app_crash_start.txt", "error_503.txt"]);
}

#[test]
fn filename_bonus_adds_one_point_per_token() {
    let tokens = query_tokens("password");
    let named = Document::new("reset_password.txt", "Reset your password. Password rules apply.");
    let anonymous = Document::new("doc_17.txt", "Reset your password. Password rules apply.");
    assert_eq!(document_score(&tokens, &anonymous), 2);
    assert_eq!(document_score(&tokens, &named), 3);
}

#[test]
fn filename_only_match_still_counts() {
    let docs = vec![Document::new("intro.txt", "welcome"), Document::new("reset_password.txt", "see settings")];
    let hits = KeywordScorer::new().score("password", &docs, 5);
    assert_eq!(hits, vec![ScoredDoc { index: 1, score: 1 }], "only positive scores are kept");
}

#[test]
fn equal_scores_keep_store_order() {
    let docs = vec![
        Document::new("z.txt", "alpha"),
        Document::new("m.txt", "alpha"),
        Document::new("q.txt", "alpha alpha"),
    ];
    let hits = KeywordScorer::new().score("alpha", &docs, 3);
    assert_eq!(sources(&docs, &hits), vec!["q.txt", "z.txt", "m.txt"]);
}

#[test]
fn repeated_query_tokens_count_repeatedly() {
    let doc = Document::new("x.txt", "cache cache");
    assert_eq!(document_score(&query_tokens("cache"), &doc), 2);
    assert_eq!(document_score(&query_tokens("cache cache"), &doc), 4);
}

#[test]
fn substring_matches_count() {
    // "pass" is counted inside "password" and "passwords"
    let doc = Document::new("x.txt", "Password and passwords");
    assert_eq!(document_score(&query_tokens("pass"), &doc), 2);
}

#[test]
fn single_character_tokens_are_a_known_blind_spot() {
    // "C" alone is dropped by the length filter even though it is meaningful here.
    let docs = vec![Document::new("a.txt", "about python"), Document::new("b.txt", "the c language")];
    let hits = KeywordScorer::new().score("C", &docs, 1);
    assert_eq!(hits, vec![ScoredDoc { index: 0, score: 0 }]);
}

#[test]
fn top_k_bounds() {
    let (_tmp, docs) = sample_docs();
    let scorer = KeywordScorer::new();
    assert!(scorer.score("password", &docs, 0).is_empty());
    assert!(scorer.score("???", &docs, 0).is_empty());
    let all = scorer.score("???", &docs, 100);
    assert_eq!(all.len(), docs.len(), "no padding beyond the store");
    assert!(scorer.score("anything", &[], 3).is_empty());
}

//! Deterministic extraction from raw completion text.
//!
//! The executor commits to its answer with a `FINAL ANSWER:` marker, and the
//! JSON-mode steps may wrap their payload in markdown code fences. Both are
//! handled here without any model involvement.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

static FINAL_ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FINAL ANSWER:\s*(.*)").expect("final answer regex"));

/// Return the text following the first `FINAL ANSWER:` marker.
///
/// Matching is case-insensitive and unanchored; the capture runs to the end of
/// the line the answer starts on. An empty capture counts as no answer.
pub fn extract_final_answer(solution: &str) -> Option<String> {
    let caps = FINAL_ANSWER_RE.captures(solution)?;
    let answer = caps.get(1)?.as_str().trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Strip surrounding markdown code fences (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Fence-strip and parse a JSON-mode completion into `T`.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    serde_json::from_str(strip_code_fences(raw))
}

//! Expected-answer matching.
//!
//! Models phrase answers freely ("The total is 9 apples."), so a case passes
//! when its expected text appears in the answer as a whole token run after
//! both sides are lowercased and whitespace runs collapse to single spaces.
//! `10` does not match `110`, and `9` does not match `9.5`.

use regex::Regex;

/// Lowercase and collapse whitespace runs.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `answer` contains `expect` on token boundaries after normalization.
pub fn answer_matches(expect: &str, answer: &str) -> bool {
    let expect = normalize(expect);
    if expect.is_empty() {
        return false;
    }
    // A trailing period ends a sentence unless a digit follows it.
    let pattern = format!(
        r"(?:^|[^\w.]){}(?:$|[^\w.]|\.(?:$|\D))",
        regex::escape(&expect)
    );
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(&normalize(answer)),
        Err(_) => false,
    }
}

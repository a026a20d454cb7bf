use reasoner::core::types::{RunResult, RunStatus};
use serde::{Deserialize, Serialize};

use crate::judge::answer_matches;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The run succeeded and the answer matched the expectation (if any).
    Verified,
    /// The run succeeded but the answer missed the expectation.
    Mismatch,
    /// The run exhausted its retries.
    Unverified,
}

pub fn classify_outcome(result: &RunResult, expect: Option<&str>) -> Outcome {
    match result.status {
        RunStatus::Failed => Outcome::Unverified,
        RunStatus::Success => match expect {
            Some(expect) if !answer_matches(expect, &result.answer) => Outcome::Mismatch,
            _ => Outcome::Verified,
        },
    }
}

//! Answer resolution for finished runs.
//!
//! On success the answer comes from the first tier that yields something:
//! the executor's `FINAL ANSWER:` line, then the verifier's corrected answer,
//! then the summarizer. The user-facing reasoning always comes from the
//! summarizer when its output parsed.

use crate::core::extract::extract_final_answer;
use crate::core::types::{FailureSummaryOutput, SummaryOutput, Verification};

/// Answer reported when retries are exhausted.
pub const UNVERIFIED_ANSWER: &str = "Unable to verify solution.";
/// Reasoning when the failure analyst gave nothing usable.
pub const FAILURE_REASONING_FALLBACK: &str = "Verification failed multiple times.";
/// Reasoning when the summarizer parsed but omitted the field.
pub const SUMMARY_REASONING_FALLBACK: &str = "Success";
/// Answer when the summarizer parsed but omitted the field.
pub const SUMMARY_ANSWER_FALLBACK: &str = "Answer found";
/// Reasoning when the summarizer output did not parse.
pub const FORMATTER_FAILED_REASONING: &str = "Solved, but formatter failed.";
/// Answer when every tier came up empty and the summarizer did not parse.
pub const FORMATTER_FAILED_ANSWER: &str = "Check logs.";

/// Answer and user-facing reasoning for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub reasoning_visible_to_user: String,
}

/// The deterministic tiers (marker, then corrected answer); `None` if both miss.
pub fn deterministic_answer(solution: &str, verification: &Verification) -> Option<String> {
    extract_final_answer(solution).or_else(|| verification.corrected_answer.clone())
}

/// Combine the deterministic tiers with the summarizer output (`None` = unparseable).
pub fn resolve_success(
    solution: &str,
    verification: &Verification,
    summary: Option<&SummaryOutput>,
) -> Resolution {
    let deterministic = deterministic_answer(solution, verification);
    match summary {
        Some(summary) => Resolution {
            answer: deterministic.unwrap_or_else(|| {
                summary
                    .answer
                    .clone()
                    .unwrap_or_else(|| SUMMARY_ANSWER_FALLBACK.to_string())
            }),
            reasoning_visible_to_user: summary
                .reasoning_visible_to_user
                .clone()
                .unwrap_or_else(|| SUMMARY_REASONING_FALLBACK.to_string()),
        },
        None => Resolution {
            answer: deterministic.unwrap_or_else(|| FORMATTER_FAILED_ANSWER.to_string()),
            reasoning_visible_to_user: FORMATTER_FAILED_REASONING.to_string(),
        },
    }
}

/// Resolution for an exhausted run; the answer is always the fixed placeholder.
pub fn resolve_failure(summary: Option<&FailureSummaryOutput>) -> Resolution {
    Resolution {
        answer: UNVERIFIED_ANSWER.to_string(),
        reasoning_visible_to_user: summary
            .and_then(|summary| summary.reasoning_visible_to_user.clone())
            .unwrap_or_else(|| FAILURE_REASONING_FALLBACK.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(corrected: Option<&str>) -> Verification {
        Verification {
            passed: true,
            feedback: Some("ok".to_string()),
            corrected_answer: corrected.map(str::to_string),
        }
    }

    fn summary(answer: Option<&str>, reasoning: Option<&str>) -> SummaryOutput {
        SummaryOutput {
            answer: answer.map(str::to_string),
            reasoning_visible_to_user: reasoning.map(str::to_string),
        }
    }

    #[test]
    fn marker_beats_corrected_answer_and_summary() {
        let resolved = resolve_success(
            "work...\nFINAL ANSWER: 42",
            &verdict(Some("17")),
            Some(&summary(Some("5"), Some("short"))),
        );
        assert_eq!(resolved.answer, "42");
        assert_eq!(resolved.reasoning_visible_to_user, "short");
    }

    #[test]
    fn corrected_answer_used_without_marker() {
        let resolved = resolve_success(
            "no marker here",
            &verdict(Some("17")),
            Some(&summary(Some("5"), Some("short"))),
        );
        assert_eq!(resolved.answer, "17");
    }

    #[test]
    fn summary_answer_is_last_tier() {
        let resolved = resolve_success(
            "no marker here",
            &verdict(None),
            Some(&summary(Some("5"), Some("short"))),
        );
        assert_eq!(resolved.answer, "5");
    }

    #[test]
    fn summary_missing_fields_use_fallbacks() {
        let resolved = resolve_success("no marker", &verdict(None), Some(&summary(None, None)));
        assert_eq!(resolved.answer, SUMMARY_ANSWER_FALLBACK);
        assert_eq!(resolved.reasoning_visible_to_user, SUMMARY_REASONING_FALLBACK);
    }

    #[test]
    fn unparseable_summary_keeps_deterministic_answer() {
        let resolved = resolve_success("FINAL ANSWER: 9", &verdict(None), None);
        assert_eq!(resolved.answer, "9");
        assert_eq!(resolved.reasoning_visible_to_user, FORMATTER_FAILED_REASONING);

        let resolved = resolve_success("no marker", &verdict(None), None);
        assert_eq!(resolved.answer, FORMATTER_FAILED_ANSWER);
    }

    #[test]
    fn failure_answer_is_fixed() {
        let resolved = resolve_failure(Some(&FailureSummaryOutput {
            reasoning_visible_to_user: Some("the times did not add up".to_string()),
        }));
        assert_eq!(resolved.answer, UNVERIFIED_ANSWER);
        assert_eq!(resolved.reasoning_visible_to_user, "the times did not add up");

        let resolved = resolve_failure(None);
        assert_eq!(resolved.answer, UNVERIFIED_ANSWER);
        assert_eq!(resolved.reasoning_visible_to_user, FAILURE_REASONING_FALLBACK);
    }
}

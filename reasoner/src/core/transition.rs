//! Controller transition rules evaluated after each verification.

use crate::core::types::Verification;

/// Feedback threaded into the next plan when the verifier gave none.
pub const DEFAULT_RETRY_FEEDBACK: &str = "Incorrect solution.";

/// Where the controller goes after the `VERIFYING` phase of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Verification passed; the loop stops.
    Success,
    /// Verification failed with budget left; re-plan with `feedback`.
    Retry { feedback: String },
    /// Verification failed on the last allowed attempt.
    Exhausted,
}

/// Decide the next state for zero-based `attempt` under a budget of `max_retries`.
pub fn next_transition(attempt: u32, max_retries: u32, verification: &Verification) -> Transition {
    if verification.passed {
        return Transition::Success;
    }
    if attempt < max_retries {
        let feedback = verification
            .feedback
            .clone()
            .unwrap_or_else(|| DEFAULT_RETRY_FEEDBACK.to_string());
        return Transition::Retry { feedback };
    }
    Transition::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(passed: bool, feedback: Option<&str>) -> Verification {
        Verification {
            passed,
            feedback: feedback.map(str::to_string),
            corrected_answer: None,
        }
    }

    #[test]
    fn pass_wins_even_on_last_attempt() {
        assert_eq!(next_transition(2, 2, &verdict(true, None)), Transition::Success);
    }

    #[test]
    fn failure_with_budget_retries_with_feedback() {
        assert_eq!(
            next_transition(0, 2, &verdict(false, Some("borrowed an hour"))),
            Transition::Retry {
                feedback: "borrowed an hour".to_string()
            }
        );
    }

    #[test]
    fn missing_feedback_uses_default() {
        assert_eq!(
            next_transition(1, 2, &verdict(false, None)),
            Transition::Retry {
                feedback: DEFAULT_RETRY_FEEDBACK.to_string()
            }
        );
    }

    #[test]
    fn failure_on_last_attempt_exhausts() {
        assert_eq!(next_transition(2, 2, &verdict(false, Some("no"))), Transition::Exhausted);
        assert_eq!(next_transition(0, 0, &verdict(false, Some("no"))), Transition::Exhausted);
    }
}

//! Verifier agent: re-derives the answer and judges the candidate solution.

use tracing::{debug, instrument, warn};

use crate::core::extract::parse_structured;
use crate::core::types::Verification;
use crate::io::completion::{Completer, ResponseMode, Role, complete_or_error_text};
use crate::io::prompt::verifier_prompt;

use super::build_request;

#[derive(Debug, Clone)]
pub struct VerifierAgent {
    model: String,
}

impl VerifierAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Judge `solution`; unparseable output degrades to [`Verification::json_error`].
    #[instrument(skip_all)]
    pub fn run<C: Completer + ?Sized>(
        &self,
        completer: &C,
        question: &str,
        plan: &str,
        solution: &str,
    ) -> Verification {
        let request = build_request(
            Role::Verifier,
            &self.model,
            verifier_prompt(),
            format!("Question: {question}\n\nPlan:\n{plan}\n\nProposed Solution:\n{solution}"),
            ResponseMode::Json,
        );
        let raw = complete_or_error_text(completer, &request);
        match parse_structured::<Verification>(&raw) {
            Ok(verification) => {
                debug!(passed = verification.passed, "parsed verification");
                verification
            }
            Err(err) => {
                warn!(err = %err, "verifier output is not valid json");
                Verification::json_error()
            }
        }
    }
}

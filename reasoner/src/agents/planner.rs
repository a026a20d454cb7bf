//! Planner agent: turns a question into a numbered plan.

use tracing::instrument;

use crate::io::completion::{Completer, ResponseMode, Role, complete_or_error_text};
use crate::io::prompt::{planner_feedback_prompt, planner_prompt};

use super::build_request;

/// User turn for a re-plan; the question and feedback already live in the system turn.
const REPLAN_REQUEST: &str = "Please provide a corrected plan.";

#[derive(Debug, Clone)]
pub struct PlannerAgent {
    model: String,
}

impl PlannerAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Produce a plan, re-planning around `feedback` from a failed attempt when given.
    ///
    /// The returned text is not validated; a malformed plan surfaces later as a
    /// failed verification.
    #[instrument(skip_all, fields(replan = feedback.is_some()))]
    pub fn run<C: Completer + ?Sized>(
        &self,
        completer: &C,
        question: &str,
        feedback: Option<&str>,
    ) -> String {
        let request = match feedback {
            Some(feedback) => build_request(
                Role::Planner,
                &self.model,
                planner_feedback_prompt(question, feedback),
                REPLAN_REQUEST.to_string(),
                ResponseMode::Text,
            ),
            None => build_request(
                Role::Planner,
                &self.model,
                planner_prompt(),
                format!("Question: {question}"),
                ResponseMode::Text,
            ),
        };
        complete_or_error_text(completer, &request)
    }
}

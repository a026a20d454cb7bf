//! Executor agent: follows a plan and commits to a `FINAL ANSWER:` line.

use tracing::instrument;

use crate::io::completion::{Completer, ResponseMode, Role, complete_or_error_text};
use crate::io::prompt::executor_prompt;

use super::build_request;

#[derive(Debug, Clone)]
pub struct ExecutorAgent {
    model: String,
}

impl ExecutorAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Produce a candidate solution for `question` by following `plan`.
    #[instrument(skip_all, fields(plan_bytes = plan.len()))]
    pub fn run<C: Completer + ?Sized>(&self, completer: &C, question: &str, plan: &str) -> String {
        let request = build_request(
            Role::Executor,
            &self.model,
            executor_prompt(),
            format!("Question: {question}\n\nPlan:\n{plan}"),
            ResponseMode::Text,
        );
        complete_or_error_text(completer, &request)
    }
}

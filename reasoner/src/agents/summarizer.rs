//! Summarizer agent: turns a verified solution into user-facing output.

use tracing::{instrument, warn};

use crate::core::extract::parse_structured;
use crate::core::types::SummaryOutput;
use crate::io::completion::{Completer, ResponseMode, Role, complete_or_error_text};
use crate::io::prompt::formatter_prompt;

use super::build_request;

const SUMMARY_REQUEST: &str = "Generate user output.";

#[derive(Debug, Clone)]
pub struct SummarizerAgent {
    model: String,
}

impl SummarizerAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Summarize `solution` without its chain-of-thought; `None` when the output does not parse.
    #[instrument(skip_all)]
    pub fn run<C: Completer + ?Sized>(&self, completer: &C, solution: &str) -> Option<SummaryOutput> {
        let request = build_request(
            Role::Summarizer,
            &self.model,
            formatter_prompt(solution),
            SUMMARY_REQUEST.to_string(),
            ResponseMode::Json,
        );
        let raw = complete_or_error_text(completer, &request);
        parse_structured(&raw)
            .inspect_err(|err| warn!(err = %err, "summarizer output is not valid json"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCompleter;

    #[test]
    fn solution_is_embedded_in_system_turn() {
        let completer = ScriptedCompleter::new()
            .summarizer(r#"{"answer": "9", "reasoning_visible_to_user": "3 red and 6 green."}"#);
        let agent = SummarizerAgent::new("m");

        let summary = agent
            .run(&completer, "Step 1: 3 * 2 = 6\nFINAL ANSWER: 9")
            .expect("summary");

        assert_eq!(summary.answer.as_deref(), Some("9"));
        assert_eq!(summary.reasoning_visible_to_user.as_deref(), Some("3 red and 6 green."));
        let request = completer.last_request().expect("request");
        assert_eq!(request.role, Role::Summarizer);
        assert_eq!(request.mode, ResponseMode::Json);
        assert_eq!(request.user, SUMMARY_REQUEST);
        assert!(request.system.contains("Step 1: 3 * 2 = 6\nFINAL ANSWER: 9"));
    }

    #[test]
    fn unparseable_output_is_none() {
        let completer = ScriptedCompleter::new().summarizer("Answer: 9");
        assert_eq!(SummarizerAgent::new("m").run(&completer, "S"), None);
    }
}

//! Failure analyst: explains an exhausted run in user-safe terms.

use tracing::{instrument, warn};

use crate::core::extract::parse_structured;
use crate::core::types::{CheckLogEntry, FailureSummaryOutput};
use crate::io::completion::{Completer, ResponseMode, Role, complete_or_error_text};
use crate::io::prompt::failure_prompt;

use super::build_request;

#[derive(Debug, Clone)]
pub struct FailureAnalystAgent {
    model: String,
}

impl FailureAnalystAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Explain why every attempt in `checks` failed; `None` when the output does not parse.
    #[instrument(skip_all, fields(attempts = checks.len()))]
    pub fn run<C: Completer + ?Sized>(
        &self,
        completer: &C,
        checks: &[CheckLogEntry],
    ) -> Option<FailureSummaryOutput> {
        let request = build_request(
            Role::FailureAnalyst,
            &self.model,
            failure_prompt(),
            format!(
                "Summarize why the agent failed. Context: {}",
                render_checks(checks)
            ),
            ResponseMode::Json,
        );
        let raw = complete_or_error_text(completer, &request);
        parse_structured(&raw)
            .inspect_err(|err| warn!(err = %err, "failure analyst output is not valid json"))
            .ok()
    }
}

/// Render the check log as a compact JSON array.
fn render_checks(checks: &[CheckLogEntry]) -> String {
    serde_json::to_string(checks).unwrap_or_else(|_| format!("{checks:?}"))
}

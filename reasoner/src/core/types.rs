//! Shared deterministic types for a single `solve` run.
//!
//! These types define the stable contract between the controller, the step
//! wrappers and the presentation layers. They carry no I/O and are local to
//! one run.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Feedback substituted when the verifier output is not valid structured data.
pub const VERIFIER_JSON_ERROR: &str = "Verifier JSON Error";

/// Structured judgment produced by the verifier for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub passed: bool,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub corrected_answer: Option<String>,
}

impl Verification {
    /// Synthetic failed verification used when the verifier output cannot be parsed.
    pub fn json_error() -> Self {
        Self {
            passed: false,
            feedback: Some(VERIFIER_JSON_ERROR.to_string()),
            corrected_answer: None,
        }
    }
}

/// Output of the success formatter (summarizer) call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryOutput {
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer: Option<String>,
    #[serde(default)]
    pub reasoning_visible_to_user: Option<String>,
}

/// Output of the failure-analyst call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FailureSummaryOutput {
    #[serde(default)]
    pub reasoning_visible_to_user: Option<String>,
}

/// One verification record per attempt, kept for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckLogEntry {
    pub check_name: String,
    pub passed: bool,
    pub details: String,
}

impl CheckLogEntry {
    /// Record the verification of the zero-based `attempt`.
    pub fn for_attempt(attempt: u32, verification: &Verification) -> Self {
        Self {
            check_name: format!("Attempt {} Verification", attempt + 1),
            passed: verification.passed,
            details: verification
                .feedback
                .clone()
                .unwrap_or_else(|| "No details".to_string()),
        }
    }
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug metadata attached to every run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Plan of the final attempt.
    pub plan: String,
    pub checks: Vec<CheckLogEntry>,
    /// Zero-based index of the final attempt.
    pub retries: u32,
}

/// Final output of one `solve` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub answer: String,
    pub status: RunStatus,
    pub reasoning_visible_to_user: String,
    pub metadata: RunMetadata,
}

/// Accept a string or a number as free text; null and blank strings are absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Accept a boolean or a `"true"`/`"false"` string; anything else, null included, is false.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_defaults_missing_fields() {
        let parsed: Verification = serde_json::from_str("{}").expect("parse");
        assert!(!parsed.passed);
        assert_eq!(parsed.feedback, None);
        assert_eq!(parsed.corrected_answer, None);
    }

    #[test]
    fn null_passed_is_a_failed_verdict_with_its_feedback() {
        let parsed: Verification = serde_json::from_str(
            r#"{"passed": null, "feedback": "Minutes borrowed wrong.", "corrected_answer": "3:35"}"#,
        )
        .expect("parse");
        assert!(!parsed.passed);
        assert_eq!(parsed.feedback.as_deref(), Some("Minutes borrowed wrong."));
        assert_eq!(parsed.corrected_answer.as_deref(), Some("3:35"));
    }

    #[test]
    fn passed_accepts_string_flags() {
        let parsed: Verification =
            serde_json::from_str(r#"{"passed": "True", "feedback": "ok"}"#).expect("parse");
        assert!(parsed.passed);
        let parsed: Verification =
            serde_json::from_str(r#"{"passed": "no", "feedback": "bad"}"#).expect("parse");
        assert!(!parsed.passed);
    }

    #[test]
    fn corrected_answer_accepts_numbers_and_drops_blanks() {
        let parsed: Verification =
            serde_json::from_str(r#"{"passed": false, "corrected_answer": 17}"#).expect("parse");
        assert_eq!(parsed.corrected_answer.as_deref(), Some("17"));

        let parsed: Verification =
            serde_json::from_str(r#"{"passed": true, "corrected_answer": "  "}"#).expect("parse");
        assert_eq!(parsed.corrected_answer, None);

        let parsed: Verification =
            serde_json::from_str(r#"{"passed": true, "corrected_answer": null}"#).expect("parse");
        assert_eq!(parsed.corrected_answer, None);
    }

    #[test]
    fn check_log_entry_uses_one_based_label() {
        let entry = CheckLogEntry::for_attempt(
            1,
            &Verification {
                passed: false,
                feedback: None,
                corrected_answer: None,
            },
        );
        assert_eq!(entry.check_name, "Attempt 2 Verification");
        assert_eq!(entry.details, "No details");
        assert!(!entry.passed);
    }

    #[test]
    fn run_result_serializes_with_lowercase_status() {
        let result = RunResult {
            answer: "42".to_string(),
            status: RunStatus::Success,
            reasoning_visible_to_user: "because".to_string(),
            metadata: RunMetadata {
                plan: "1. think".to_string(),
                checks: vec![CheckLogEntry {
                    check_name: "Attempt 1 Verification".to_string(),
                    passed: true,
                    details: "ok".to_string(),
                }],
                retries: 0,
            },
        };

        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["status"], "success");
        assert_eq!(value["metadata"]["retries"], 0);
        assert_eq!(value["metadata"]["checks"][0]["check_name"], "Attempt 1 Verification");
        assert_eq!(value["metadata"]["checks"][0]["details"], "ok");
    }
}

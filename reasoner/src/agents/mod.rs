//! Step wrappers around single completion calls.
//!
//! Each agent owns the model identifier, renders its own system and user
//! turns, and folds completion failures into text via
//! [`complete_or_error_text`](crate::io::completion::complete_or_error_text).

use crate::io::completion::{CompletionRequest, ResponseMode, Role};

pub mod executor;
pub mod failure;
pub mod planner;
pub mod summarizer;
pub mod verifier;

pub(crate) fn build_request(
    role: Role,
    model: &str,
    system: String,
    user: String,
    mode: ResponseMode,
) -> CompletionRequest {
    CompletionRequest {
        role,
        model: model.to_string(),
        system,
        user,
        mode,
    }
}

//! Text-completion abstraction for step invocation.
//!
//! The [`Completer`] trait decouples the plan/execute/verify loop from the
//! actual model backend. Tests use scripted completers that return
//! predetermined text without touching the network.

use std::fmt;

use anyhow::Result;
use tracing::{debug, instrument, warn};

/// Prefix of the text substituted for a failed completion call.
pub const COMPLETION_ERROR_PREFIX: &str = "Error calling LLM:";

/// Which pipeline step issued a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Planner,
    Executor,
    Verifier,
    Summarizer,
    FailureAnalyst,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Planner => "planner",
            Role::Executor => "executor",
            Role::Verifier => "verifier",
            Role::Summarizer => "summarizer",
            Role::FailureAnalyst => "failure_analyst",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output constraint requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Free text.
    Text,
    /// The backend is expected to emit syntactically valid JSON.
    Json,
}

/// Parameters for a single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Step that issued the request.
    pub role: Role,
    /// Model identifier of the orchestrator.
    pub model: String,
    /// System instruction.
    pub system: String,
    /// User turn.
    pub user: String,
    pub mode: ResponseMode,
}

/// Abstraction over text-completion backends.
pub trait Completer {
    /// Run one completion and return the raw response text.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

impl<C: Completer + ?Sized> Completer for &C {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }
}

impl<C: Completer + ?Sized> Completer for Box<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }
}

/// Run a completion, folding any backend failure into error-labelled text.
///
/// The pipeline treats the returned string as ordinary content either way, so
/// a failed call surfaces later as a failed verification rather than an error.
#[instrument(skip_all, fields(role = %request.role, model = %request.model, json = request.mode == ResponseMode::Json))]
pub fn complete_or_error_text<C: Completer + ?Sized>(
    completer: &C,
    request: &CompletionRequest,
) -> String {
    match completer.complete(request) {
        Ok(text) => {
            debug!(bytes = text.len(), "completion returned");
            text
        }
        Err(err) => {
            warn!(err = %format!("{err:#}"), "completion failed, continuing with error text");
            format!("{COMPLETION_ERROR_PREFIX} {err:#}")
        }
    }
}

//! Shared application state for the UI server.

use std::sync::Arc;

use reasoner::io::completion::Completer;
use reasoner::solve::Orchestrator;

/// Any thread-safe completion backend.
pub type DynCompleter = Box<dyn Completer + Send + Sync>;

/// Shared state accessible from all request handlers.
///
/// `solve` only reads the orchestrator, so one instance serves concurrent
/// requests from the blocking pool.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator<DynCompleter>>,
    /// Backend label shown by `/api/health`.
    pub backend: &'static str,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator<DynCompleter>, backend: &'static str) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            backend,
        }
    }
}

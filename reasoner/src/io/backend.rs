//! Config-selected completion backend.

use anyhow::{Context, Result};
use tracing::info;

use crate::io::command::CommandCompleter;
use crate::io::completion::{Completer, CompletionRequest};
use crate::io::config::BackendConfig;
use crate::io::ollama::OllamaCompleter;

/// The completion backends a config file can name.
pub enum Backend {
    Ollama(OllamaCompleter),
    Command(CommandCompleter),
}

impl Backend {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        match config {
            BackendConfig::Ollama(ollama) => {
                info!(endpoint = %ollama.endpoint, "using ollama backend");
                let completer =
                    OllamaCompleter::new(ollama.clone()).context("create ollama backend")?;
                Ok(Backend::Ollama(completer))
            }
            BackendConfig::Command(command) => {
                info!(program = ?command.program, "using command backend");
                let completer =
                    CommandCompleter::new(command.clone()).context("create command backend")?;
                Ok(Backend::Command(completer))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Ollama(_) => "ollama",
            Backend::Command(_) => "command",
        }
    }
}

impl Completer for Backend {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            Backend::Ollama(completer) => completer.complete(request),
            Backend::Command(completer) => completer.complete(request),
        }
    }
}

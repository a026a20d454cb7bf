//! Completion backend that shells out to a local command.
//!
//! The command receives the rendered prompt on stdin and prints the
//! completion on stdout, e.g. `ollama run llama3.1:8b`.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{info, instrument, warn};

use crate::io::completion::{Completer, CompletionRequest, ResponseMode};
use crate::io::config::CommandConfig;
use crate::io::process::{ProcessLimits, run_with_input};

const MODEL_PLACEHOLDER: &str = "{model}";

/// Completer that spawns a configured command per request.
#[derive(Debug, Clone)]
pub struct CommandCompleter {
    config: CommandConfig,
}

impl CommandCompleter {
    pub fn new(config: CommandConfig) -> Result<Self> {
        if config.program.is_empty() {
            return Err(anyhow!("command backend needs a program"));
        }
        Ok(Self { config })
    }

    /// Full argv for a request, with `{model}` substituted.
    fn argv(&self, request: &CompletionRequest) -> Vec<String> {
        let mut argv: Vec<String> = self
            .config
            .program
            .iter()
            .map(|arg| arg.replace(MODEL_PLACEHOLDER, &request.model))
            .collect();
        if request.mode == ResponseMode::Json {
            argv.extend(self.config.json_args.iter().cloned());
        }
        argv
    }
}

/// Flatten the system and user turns into one stdin prompt.
pub fn render_stdin_prompt(request: &CompletionRequest) -> String {
    format!(
        "{}\n\n{}\n",
        request.system.trim_end(),
        request.user.trim_end()
    )
}

impl Completer for CommandCompleter {
    #[instrument(skip_all, fields(role = %request.role, program = %self.config.program[0]))]
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let argv = self.argv(request);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("command backend needs a program"))?;
        info!(program = %program, "starting completion command");

        let mut cmd = Command::new(program);
        cmd.args(args);
        let output = run_with_input(
            cmd,
            render_stdin_prompt(request).as_bytes(),
            ProcessLimits {
                timeout: Duration::from_secs(self.config.timeout_secs),
                output_limit_bytes: self.config.output_limit_bytes,
            },
        )?;

        if output.timed_out {
            return Err(anyhow!(
                "{program} timed out after {}s",
                self.config.timeout_secs
            ));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "completion command failed");
            return Err(anyhow!(
                "{program} failed with status {:?}: {}",
                output.status.code(),
                output.stderr_lossy().trim()
            ));
        }
        Ok(output.stdout_lossy().trim().to_string())
    }
}

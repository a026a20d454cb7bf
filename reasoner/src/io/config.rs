//! Reasoner configuration stored in `reasoner.toml`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::solve::DEFAULT_MAX_RETRIES;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "reasoner.toml";

const CONFIG_HEADER: &str = "# reasoner configuration\n# backend.kind is \"ollama\" or \"command\".\n\n";

/// Reasoner configuration (TOML).
///
/// Every field has a default so a missing or partial file still yields a
/// runnable setup against a local Ollama.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Model identifier passed with every completion request.
    pub model: String,

    /// Additional attempts after the first failed verification.
    pub max_retries: u32,

    pub backend: BackendConfig,
}

/// Completion backend selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Ollama chat API over HTTP.
    Ollama(OllamaConfig),
    /// Any command that reads a prompt on stdin and prints the completion.
    Command(CommandConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub text_temperature: f64,
    pub json_temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CommandConfig {
    /// Program and arguments; `{model}` is replaced by the model identifier.
    pub program: Vec<String>,
    /// Extra arguments appended when JSON output is requested.
    pub json_args: Vec<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            timeout_secs: 120,
            text_temperature: 0.2,
            json_temperature: 0.1,
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: vec![
                "ollama".to_string(),
                "run".to_string(),
                "{model}".to_string(),
            ],
            json_args: vec!["--format".to_string(), "json".to_string()],
            timeout_secs: 300,
            output_limit_bytes: 100_000,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Ollama(OllamaConfig::default())
    }
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1:8b".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            backend: BackendConfig::default(),
        }
    }
}

impl ReasonerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must be non-empty"));
        }
        match &self.backend {
            BackendConfig::Ollama(ollama) => {
                if ollama.endpoint.trim().is_empty() {
                    return Err(anyhow!("backend.endpoint must be non-empty"));
                }
                if ollama.timeout_secs == 0 {
                    return Err(anyhow!("backend.timeout_secs must be > 0"));
                }
            }
            BackendConfig::Command(command) => {
                if command.program.is_empty() || command.program[0].trim().is_empty() {
                    return Err(anyhow!("backend.program must be a non-empty array"));
                }
                if command.timeout_secs == 0 {
                    return Err(anyhow!("backend.timeout_secs must be > 0"));
                }
                if command.output_limit_bytes == 0 {
                    return Err(anyhow!("backend.output_limit_bytes must be > 0"));
                }
            }
        }
        Ok(())
    }
}

/// Read `reasoner.toml`; a missing file yields the validated defaults.
pub fn load_config(path: &Path) -> Result<ReasonerConfig> {
    let cfg = match fs::read_to_string(path) {
        Ok(contents) => toml::from_str::<ReasonerConfig>(&contents)
            .with_context(|| format!("parse {}", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            ReasonerConfig::default()
        }
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Write `cfg` as TOML under a short header, creating parent directories.
pub fn write_config(path: &Path, cfg: &ReasonerConfig) -> Result<()> {
    cfg.validate()?;
    let body = toml::to_string_pretty(cfg).context("serialize config toml")?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(path, format!("{CONFIG_HEADER}{body}"))
        .with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ReasonerConfig::default());
        assert_eq!(cfg.max_retries, 2);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("reasoner.toml");
        let cfg = ReasonerConfig {
            model: "qwen2.5:7b".to_string(),
            max_retries: 4,
            backend: BackendConfig::Command(CommandConfig::default()),
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
        let text = fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("# reasoner configuration"));
    }

    #[test]
    fn write_creates_missing_parent_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("reasoner.toml");
        write_config(&path, &ReasonerConfig::default()).expect("write");
        assert_eq!(load_config(&path).expect("load"), ReasonerConfig::default());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(temp.path()).unwrap_err();
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("reasoner.toml");
        fs::write(
            &path,
            "model = \"mistral\"\n\n[backend]\nkind = \"ollama\"\ntimeout_secs = 30\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.model, "mistral");
        assert_eq!(cfg.max_retries, DEFAULT_MAX_RETRIES);
        let BackendConfig::Ollama(ollama) = cfg.backend else {
            panic!("expected ollama backend");
        };
        assert_eq!(ollama.timeout_secs, 30);
        assert_eq!(ollama.endpoint, "http://localhost:11434");
    }

    #[test]
    fn validate_rejects_empty_command() {
        let cfg = ReasonerConfig {
            backend: BackendConfig::Command(CommandConfig {
                program: Vec::new(),
                ..CommandConfig::default()
            }),
            ..ReasonerConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("backend.program"));
    }

    #[test]
    fn validate_rejects_blank_model() {
        let cfg = ReasonerConfig {
            model: "  ".to_string(),
            ..ReasonerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}

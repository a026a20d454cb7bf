//! Completion backend for the Ollama chat API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::io::completion::{Completer, CompletionRequest, ResponseMode};
use crate::io::config::OllamaConfig;

/// Blocking client for `POST {endpoint}/api/chat`.
pub struct OllamaCompleter {
    config: OllamaConfig,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaCompleter {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'))
    }

    fn body<'a>(&self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let (format, temperature) = match request.mode {
            ResponseMode::Text => (None, self.config.text_temperature),
            ResponseMode::Json => (Some("json"), self.config.json_temperature),
        };
        ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            stream: false,
            format,
            options: ChatOptions { temperature },
        }
    }
}

impl Completer for OllamaCompleter {
    #[instrument(skip_all, fields(role = %request.role, model = %request.model))]
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = self.chat_url();
        debug!(url = %url, "posting chat request");

        let response = self
            .client
            .post(&url)
            .json(&self.body(request))
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    anyhow!("request timed out after {}s", self.config.timeout_secs)
                } else {
                    anyhow::Error::new(err).context(format!("post {url}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "ollama returned an error status");
            return Err(anyhow!("HTTP {status} from ollama: {}", body.trim()));
        }

        let parsed: ChatResponse = response.json().context("parse ollama chat response")?;
        Ok(parsed.message.content)
    }
}

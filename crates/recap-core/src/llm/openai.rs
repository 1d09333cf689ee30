//! OpenAI-compatible chat completions client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::LanguageModel;
use crate::config::{ApiKey, LlmConfig};
use crate::error::{RecapError, Result};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Blocking client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: ApiKey,
    model: String,
    max_tokens: u32,
    user_agent: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig, api_key: ApiKey) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: agent_config.into(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            user_agent: format!(
                "recap/{} ({})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS
            ),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LanguageModel for OpenAiClient {
    #[tracing::instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        let payload = serde_json::to_string(&request)?;

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("User-Agent", &self.user_agent)
            .send(payload)
            .map_err(|e| RecapError::service(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RecapError::service(format!("failed to read response body: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(RecapError::service(describe_failure(status, &body)));
        }

        let reply = parse_chat_response(&body)?;
        tracing::debug!(status, reply_len = reply.len(), "completion");
        Ok(reply)
    }
}

/// Extract the first choice's text from a chat completions body
pub fn parse_chat_response(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| RecapError::service(format!("malformed response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| RecapError::service("response contained no text choice"))
}

fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("HTTP {}: {}", status, envelope.error.message),
        Err(_) => format!("HTTP {}", status),
    }
}

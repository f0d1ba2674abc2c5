//! OpenRouter backend implementation.
//!
//! Sends a single chat-completion request and turns the reply into a bare
//! shell command.

use super::clean::clean_command;
use crate::client::Spinner;
use crate::error::{Error, Result};
use crate::prompt::{build_prompt, Prompt};
use crate::protocol::{ChatMessage, ChatRequest, ChatResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Client-side deadline for one request, including reading the body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.1;

// Attribution headers expected by OpenRouter.
const REFERER: &str = "https://github.com/terminalai/terminalai";
const TITLE: &str = "terminalai";

/// Phrases in an error body that always blame the model id.
const MODEL_ERRORS: [&str; 4] = [
    "not a valid model",
    "invalid model",
    "model not found",
    "no endpoints found",
];

/// Phrases that blame the model id when the body also mentions a model.
const UNAVAILABLE_HINTS: [&str; 4] = ["not available", "unavailable", "disabled", "does not exist"];

/// OpenRouter chat-completion client.
pub struct OpenRouterClient {
    pub model: String,
    api_key: String,
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl OpenRouterClient {
    /// Create a client for the given credential and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            model: model.into(),
            api_key: api_key.into(),
            endpoint: OPENROUTER_API_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            client,
        })
    }

    /// Send requests somewhere other than the public endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a command for `query` in the syntax of `shell`.
    pub async fn generate_command(&self, query: &str, shell: &str) -> Result<String> {
        let prompt = build_prompt(query, shell);
        self.generate(&prompt).await
    }

    /// Generate a command from a prepared prompt.
    pub async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = self.request_for(prompt);
        debug!("Requesting completion from {} ({})", self.endpoint, self.model);

        let (status, body) = {
            let _spinner = Spinner::start("Generating command...");
            tokio::time::timeout(self.timeout, self.send(&request))
                .await
                .map_err(|_| Error::ModelTimeout {
                    model: self.model.clone(),
                    timeout: self.timeout,
                })??
        };

        debug!("Received status {} ({} bytes)", status, body.len());
        self.interpret(status, &body)
    }

    fn request_for(&self, prompt: &Prompt) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt.system.as_str()),
                ChatMessage::user(prompt.user.as_str()),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Perform the POST and read the whole body.
    async fn send(&self, request: &ChatRequest) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Classify the raw response and extract the command.
    fn interpret(&self, status: StatusCode, body: &str) -> Result<String> {
        if !status.is_success() {
            debug!("OpenRouter returned {}: {}", status, body);
            if is_model_unavailable(status, body) {
                return Err(Error::ModelUnavailable {
                    model: self.model.clone(),
                    message: body.to_string(),
                });
            }
            return Err(Error::Transport {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }

        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(Error::ModelUnavailable {
                model: self.model.clone(),
                message: error.message,
            });
        }

        let content = response.first_content().ok_or(Error::EmptyResponse)?;
        Ok(clean_command(content))
    }
}

/// Whether a failed response blames the selected model.
fn is_model_unavailable(status: StatusCode, body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    if MODEL_ERRORS.iter().any(|phrase| body.contains(phrase)) {
        return true;
    }
    body.contains("model")
        && (status == StatusCode::NOT_FOUND
            || UNAVAILABLE_HINTS.iter().any(|hint| body.contains(hint)))
}

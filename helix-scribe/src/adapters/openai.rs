//! OpenAI-compatible `/chat/completions` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{Result, ScribeError};
use crate::ports::{CompletionRequest, TextGenerator};

#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ScribeError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });

        ChatRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

fn service_error(e: &reqwest::Error) -> ScribeError {
    if e.is_timeout() {
        ScribeError::GenerationService(format!("request timed out: {e}"))
    } else {
        ScribeError::GenerationService(e.to_string())
    }
}

fn parse_error_body(status: reqwest::StatusCode, body: &str) -> ScribeError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| body.trim().to_string(), |env| env.error.message);
    ScribeError::GenerationService(format!("{status}: {message}"))
}

fn parse_success_body(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ScribeError::GenerationService(format!("malformed response: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            ScribeError::GenerationService("malformed response: no message content".to_string())
        })
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| service_error(&e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| service_error(&e))?;

        if status.is_success() {
            parse_success_body(&text)
        } else {
            Err(parse_error_body(status, &text))
        }
    }
}

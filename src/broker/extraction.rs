//! Broker name extraction from free text through an OpenAI-compatible chat
//! completions endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{BrokerGraphError, Result};

const EXTRACTION_INSTRUCTION: &str = "\
You extract the names of real estate brokers from articles, emails and conversations.

Rules:
- Extract human names only. Never extract organizations or property names.
- Only extract names that appear in the text.
- Not every person mentioned is a broker; use context to decide.
- Respond with JSON only, no explanation, in exactly this shape:
  {\"brokers\": [{\"name\": \"<full name>\", \"confidence\": <0.0 to 1.0>}]}
- If no broker is mentioned respond with {\"brokers\": []}.";

/// A broker name found in text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedBroker {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Finds broker names in unstructured text
#[async_trait]
pub trait BrokerExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<ExtractedBroker>>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ExtractionPayload {
    #[serde(default)]
    brokers: Vec<ExtractedBroker>,
}

/// Outcome of one request attempt
enum Attempt {
    Transient(String),
    Fatal(BrokerGraphError),
}

/// Chat-completions extractor with exponential backoff on 429 and 5xx
pub struct LlmBrokerExtractor {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_retries: usize,
    initial_backoff: Duration,
}

impl LlmBrokerExtractor {
    pub fn new(client: Client, config: &LlmConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_secs(1),
        }
    }

    /// Build from config, reading the API key from the configured variable
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            BrokerGraphError::Config(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::new(client, config, api_key))
    }

    pub fn with_backoff(mut self, initial: Duration) -> Self {
        self.initial_backoff = initial;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn complete_once(&self, text: &str) -> std::result::Result<String, Attempt> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: EXTRACTION_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    Attempt::Transient(format!("network error: {}", e))
                } else {
                    Attempt::Fatal(e.into())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            let message = format!("chat completions error {}: {}", status, body);
            return Err(if is_transient(status) {
                Attempt::Transient(message)
            } else {
                Attempt::Fatal(BrokerGraphError::Llm(message))
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Fatal(BrokerGraphError::Llm(format!("invalid response: {}", e))))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Attempt::Fatal(BrokerGraphError::Llm("empty completion".to_string())))
    }

    async fn complete(&self, text: &str) -> Result<String> {
        let mut attempt = 0;
        let mut delay = self.initial_backoff;

        loop {
            match self.complete_once(text).await {
                Ok(content) => return Ok(content),
                Err(Attempt::Transient(message)) if attempt < self.max_retries => {
                    log::warn!(
                        "Retry {}/{} after error: {}",
                        attempt + 1,
                        self.max_retries,
                        message
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(Attempt::Transient(message)) => return Err(BrokerGraphError::Llm(message)),
                Err(Attempt::Fatal(e)) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl BrokerExtractor for LlmBrokerExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<ExtractedBroker>> {
        let start = std::time::Instant::now();
        let content = self.complete(text).await?;
        let brokers = parse_extraction(&content)?;
        log::debug!(
            "extracted {} broker names in {:?}",
            brokers.len(),
            start.elapsed()
        );
        Ok(brokers)
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Remove a surrounding ``` fence (with or without a language tag)
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse `{"brokers": [...]}` out of a completion
pub fn parse_extraction(content: &str) -> Result<Vec<ExtractedBroker>> {
    let payload: ExtractionPayload = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| BrokerGraphError::Llm(format!("unparseable extraction output: {}", e)))?;
    Ok(payload
        .brokers
        .into_iter()
        .filter(|b| !b.name.trim().is_empty())
        .collect())
}

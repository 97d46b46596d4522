use std::env;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GenerationConfig {
    /// Read the endpoint configuration from the environment.
    ///
    /// Returns `None` when `LUMINA_AI_API_KEY` is absent or blank; a missing
    /// credential disables the AI features instead of failing startup.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LUMINA_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("LUMINA_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("LUMINA_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// One prompt for the generation endpoint, optionally carrying a structured
/// output contract the response has to conform to.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: Option<Value>,
    pub temperature: f32,
}

impl GenerationRequest {
    /// A free-text request.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            temperature: 0.2,
        }
    }

    /// A request whose response must be JSON matching `schema`.
    #[must_use]
    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
            temperature: 0.2,
        }
    }
}

/// Transport seam for the generation endpoint.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Resolve one request to the raw generated text.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the request fails or the response
    /// carries no usable text.
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// [`GenerationBackend`] over an OpenAI-compatible `chat/completions`
/// endpoint.
pub struct HttpGenerationBackend {
    client: Client,
    config: GenerationConfig,
}

impl HttpGenerationBackend {
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatTurn {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            response_format: request.response_schema.as_ref().map(|schema| ResponseFormat {
                kind: "json_schema",
                json_schema: SchemaEnvelope {
                    name: "generation",
                    strict: true,
                    schema: schema.clone(),
                },
            }),
        };

        debug!("requesting completion from {url}");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatTurn>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatTurn {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: SchemaEnvelope,
}

#[derive(Debug, Serialize)]
struct SchemaEnvelope {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatTurnResponse,
}

#[derive(Debug, Deserialize)]
struct ChatTurnResponse {
    content: Option<String>,
}

//! Chat-completions bridge
//!
//! Sends a single user message to an OpenAI-compatible
//! `/chat/completions` endpoint (Groq by default) and returns the first
//! choice's content. Provider error bodies are logged at debug level only;
//! callers see a [`ModelError`] category.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{Credential, ModelCaller, ModelError};
use crate::workflow::ModelConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug)]
pub struct ChatBridge {
    config: ModelConfig,
    client: reqwest::Client,
}

impl ChatBridge {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelError> {
        Self::new(config.clone())
    }

    fn build_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn apply_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }
        request
    }
}

/// Map an HTTP status to the error category it represents
fn classify_status(status: u16) -> Option<ModelError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(ModelError::AuthFailure),
        _ => Some(ModelError::UpstreamUnavailable(format!("HTTP {}", status))),
    }
}

#[async_trait]
impl ModelCaller for ChatBridge {
    async fn invoke(&self, prompt: &str, credential: &Credential) -> Result<String, ModelError> {
        let url = self.build_url();
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            response_format: self
                .config
                .json_mode
                .then_some(ResponseFormat { kind: "json_object" }),
            stream: false,
        };

        let request = self
            .client
            .post(&url)
            .bearer_auth(credential.expose())
            .json(&body);
        let request = self.apply_headers(request);

        debug!("POST {} (model: {})", url, self.config.model);
        let start = std::time::Instant::now();

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Model call timed out");
                ModelError::Timeout
            } else {
                warn!("Model call failed: {}", e);
                ModelError::UpstreamUnavailable(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if let Some(err) = classify_status(status) {
            let detail = response.text().await.unwrap_or_default();
            debug!(status, body = %detail, "Provider rejected request");
            return Err(err);
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout
            } else {
                ModelError::UpstreamUnavailable(format!("undecodable response: {}", e))
            }
        })?;

        info!(
            "POST {} -> {} ({}ms)",
            url,
            status,
            start.elapsed().as_millis()
        );

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

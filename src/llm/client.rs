//! Completion client for an OpenAI-compatible provider
//!
//! Every call sends a system prompt plus the text to summarize and normalizes
//! the provider's answer (or failure) into a [`Result`]. No retries are made:
//! a failed call is reported to the caller, which decides whether to skip it.

use super::models::{extract_content, ChatCompletionRequest, ChatMessage};
use super::roster::PLACEHOLDER_MODEL_ID;
use crate::config::ProviderConfig;
use crate::error::{Result, SummaryError};
use crate::metrics::METRICS;
use crate::pipeline::models::{CompletionRequest, PLACEHOLDER_MARKER};
use crate::pipeline::prompts::{build_system_prompt, build_user_prompt};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use std::time::Instant;
use tracing::{debug, warn};

/// Characters of input echoed back by placeholder mode
const PLACEHOLDER_PREVIEW_CHARS: usize = 100;

/// Anything that can turn a [`CompletionRequest`] into text
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// HTTP completion client
pub struct CompletionClient {
    http: Client,
    config: ProviderConfig,
}

impl CompletionClient {
    /// Create a new completion client
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SummaryError::Internal(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Whether every call is answered in placeholder mode
    pub fn is_offline(&self) -> bool {
        self.config.offline
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let options = &request.options;
        let system_prompt = build_system_prompt(
            options.length,
            options.format,
            options.creativity,
            request.intermediate,
        );

        ChatCompletionRequest {
            model: request.model_id.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(build_user_prompt(&request.text)),
            ],
            temperature: options.creativity.temperature(),
        }
    }

    async fn call_provider(&self, request: &CompletionRequest) -> Result<String> {
        let url = self
            .config
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(SummaryError::MissingEndpoint)?;
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(SummaryError::MissingCredential)?;

        let body = self.build_request(request);
        debug!(
            "Calling completion provider: model={}, intermediate={}, chars={}",
            request.model_id,
            request.intermediate,
            request.text.len()
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(SummaryError::Network(format!("HTTP {}: {}", status, text)));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|_| SummaryError::MalformedResponse { body: text.clone() })?;

        extract_content(&json).ok_or_else(|| SummaryError::UnexpectedShape {
            raw: json.to_string(),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> SummaryError {
        if e.is_timeout() {
            SummaryError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else {
            SummaryError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if request.model_id.trim().is_empty() {
            return Err(SummaryError::MissingModel);
        }

        let mode = if request.intermediate { "intermediate" } else { "final" };

        if self.config.offline || request.model_id == PLACEHOLDER_MODEL_ID {
            METRICS.record_completion(mode, "placeholder");
            return Ok(placeholder_response(request));
        }

        let start = Instant::now();
        let result = self.call_provider(request).await;
        METRICS
            .completion_duration
            .with_label_values(&[mode])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => METRICS.record_completion(mode, "success"),
            Err(e) => {
                warn!("Completion call failed: {}", e);
                METRICS.record_completion(mode, e.code());
            }
        }

        result
    }
}

/// Deterministic canned answer used instead of a provider call
pub fn placeholder_response(request: &CompletionRequest) -> String {
    let preview: String = request.text.chars().take(PLACEHOLDER_PREVIEW_CHARS).collect();
    let stage = if request.intermediate { " (intermediate)" } else { "" };
    format!(
        "{}{}] Summary for: '{}...'. Length: {}, Format: {}, Creativity: {}",
        PLACEHOLDER_MARKER,
        stage,
        preview,
        request.options.length.as_str(),
        request.options.format.as_str(),
        request.options.creativity.as_str(),
    )
}

//! Request and response bodies for the HTTP API

use crate::error::{ErrorKind, SummaryError};
use crate::llm::ModelDescriptor;
use crate::pipeline::{Creativity, OutputFormat, Strategy, Summary, SummaryLength, SummaryOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summarize either `text` or the page at `url`
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub creativity: Creativity,
    /// Defaults to the first model in the roster
    #[serde(default)]
    pub model_id: Option<String>,
}

impl SummarizeRequest {
    pub fn options(&self) -> SummaryOptions {
        SummaryOptions::new(self.length, self.format, self.creativity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub format: OutputFormat,
    pub strategy: Strategy,
    pub total_tokens: usize,
    pub chunk_count: usize,
    pub used_chunks: usize,
    pub warnings: Vec<String>,
    /// Output came from placeholder mode, not a model
    pub placeholder: bool,
    pub file_name: String,
    pub mime_type: String,
}

impl SummarizeResponse {
    pub fn new(summary: Summary, format: OutputFormat) -> Self {
        let placeholder = summary.is_placeholder();
        Self {
            summary: summary.text,
            format,
            strategy: summary.strategy,
            total_tokens: summary.total_tokens,
            chunk_count: summary.chunk_count,
            used_chunks: summary.used_chunks,
            warnings: summary.warnings,
            placeholder,
            file_name: format.file_name().to_string(),
            mime_type: format.mime_type().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelDescriptor>,
    pub default_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub tokenizer: String,
    pub offline: bool,
    pub models: usize,
    pub timestamp: DateTime<Utc>,
}

/// API error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub message: String,
}

/// Code for request bodies that cannot be parsed
pub const INVALID_REQUEST: &str = "invalid_request";

impl ApiError {
    pub fn new(code: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            kind: Some(kind),
            message: message.into(),
        }
    }
}

impl From<&SummaryError> for ApiError {
    fn from(err: &SummaryError) -> Self {
        Self::new(err.code(), err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: SummarizeRequest = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(request.options(), SummaryOptions::default());
        assert!(request.url.is_none());
        assert!(request.model_id.is_none());
    }

    #[test]
    fn test_request_unknown_creativity() {
        let request: SummarizeRequest =
            serde_json::from_str(r#"{"text":"hello","creativity":"bold","format":"html"}"#).unwrap();
        assert_eq!(request.creativity, Creativity::Medium);
        assert_eq!(request.format, OutputFormat::Html);
    }

    #[test]
    fn test_api_error_from_summary_error() {
        let error = ApiError::from(&SummaryError::Timeout { seconds: 180 });
        assert_eq!(error.code, "provider_timeout");
        assert_eq!(error.kind, Some(ErrorKind::Provider));
        assert!(error.message.contains("180"));
    }

    #[test]
    fn test_api_error_parses_from_json() {
        let error: ApiError = serde_json::from_str(
            r#"{"code":"missing_endpoint","kind":"configuration","message":"not configured"}"#,
        )
        .unwrap();
        assert_eq!(error.kind, Some(ErrorKind::Configuration));

        let error: ApiError = serde_json::from_str(r#"{"code":"x","message":"y"}"#).unwrap();
        assert!(error.kind.is_none());
    }
}

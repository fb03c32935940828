//! Error types for the summarization pipeline
//!
//! Every failure the pipeline can report is a [`SummaryError`]. Each variant
//! belongs to exactly one [`ErrorKind`], so callers only need `is_err()` plus
//! `kind()` to decide how to surface a failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid settings, detected before any network call
    Configuration,
    /// The completion or extraction provider failed or answered badly
    Provider,
    /// The input itself cannot be summarized
    Content,
}

/// Summarization errors
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Completion provider URL is not configured (set PROXY_WORKER_URL)")]
    MissingEndpoint,

    #[error("Completion provider credential is not configured (set PROXY_MASTER_KEY)")]
    MissingCredential,

    #[error("No model identifier was provided")]
    MissingModel,

    #[error("Invalid token budget: {0}")]
    InvalidBudget(String),

    #[error("Request to the completion provider timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Network error while calling the provider: {0}")]
    Network(String),

    #[error("Provider returned a body that is not valid JSON: {body}")]
    MalformedResponse { body: String },

    #[error("Unexpected response shape from the completion provider: {raw}")]
    UnexpectedShape { raw: String },

    #[error("Unexpected error while talking to the provider: {0}")]
    Internal(String),

    #[error("Nothing to summarize: input text is empty")]
    EmptyInput,

    #[error("Could not extract text from the page: {0}")]
    ExtractionFailed(String),

    #[error("Could not split the text into chunks")]
    Unsplittable,

    #[error("Could not build intermediate summaries for aggregation")]
    NoIntermediateSummaries,
}

impl SummaryError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEndpoint
            | Self::MissingCredential
            | Self::MissingModel
            | Self::InvalidBudget(_) => ErrorKind::Configuration,
            Self::Timeout { .. }
            | Self::Network(_)
            | Self::MalformedResponse { .. }
            | Self::UnexpectedShape { .. }
            | Self::Internal(_) => ErrorKind::Provider,
            Self::EmptyInput
            | Self::ExtractionFailed(_)
            | Self::Unsplittable
            | Self::NoIntermediateSummaries => ErrorKind::Content,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingEndpoint => "missing_endpoint",
            Self::MissingCredential => "missing_credential",
            Self::MissingModel => "missing_model",
            Self::InvalidBudget(_) => "invalid_budget",
            Self::Timeout { .. } => "provider_timeout",
            Self::Network(_) => "provider_network",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::UnexpectedShape { .. } => "unexpected_response_shape",
            Self::Internal(_) => "internal",
            Self::EmptyInput => "empty_input",
            Self::ExtractionFailed(_) => "extraction_failed",
            Self::Unsplittable => "unsplittable",
            Self::NoIntermediateSummaries => "no_intermediate_summaries",
        }
    }
}

/// Result type for summarization operations
pub type Result<T> = std::result::Result<T, SummaryError>;

//! Client for the page extraction service
//!
//! The service takes `{"url": ...}` and answers
//! `{"status": "success", "extracted_markdown": ...}`, or a non-2xx status
//! with `{"detail": ...}`.

use crate::config::ExtractionConfig;
use crate::error::{Result, SummaryError};
use crate::metrics::METRICS;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    extracted_markdown: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Extraction service client
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: Client,
    config: ExtractionConfig,
}

impl ExtractionClient {
    /// Create a new extraction client
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SummaryError::Internal(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Fetch the page at `url` and return its text as markdown
    pub async fn extract(&self, url: &str) -> Result<String> {
        let result = self.fetch(url).await;
        METRICS.record_extraction(result.is_ok());
        match &result {
            Ok(text) => info!("Extracted {} characters from {}", text.len(), url),
            Err(e) => warn!("Extraction failed for {}: {}", url, e),
        }
        result
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SummaryError::ExtractionFailed("URL is empty".to_string()));
        }

        debug!("Requesting extraction: endpoint={}, url={}", self.config.endpoint, url);

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&ScrapeRequest { url })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummaryError::ExtractionFailed(format!(
                        "extraction service timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    SummaryError::ExtractionFailed(format!("extraction service unreachable: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummaryError::ExtractionFailed(e.to_string()))?;
        let parsed: Option<ScrapeResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let detail = parsed
                .and_then(|p| p.detail)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
            return Err(SummaryError::ExtractionFailed(detail));
        }

        let parsed = parsed.ok_or_else(|| {
            SummaryError::ExtractionFailed("extraction service returned invalid JSON".to_string())
        })?;

        if parsed.status.as_deref() != Some("success") {
            return Err(SummaryError::ExtractionFailed(parsed.detail.unwrap_or_else(|| {
                format!("unexpected status: {}", parsed.status.unwrap_or_default())
            })));
        }

        parsed
            .extracted_markdown
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| SummaryError::ExtractionFailed("page has no extractable text".to_string()))
    }
}

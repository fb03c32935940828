//! Data models for summarization requests and results

use serde::{Deserialize, Serialize};

/// Marker every placeholder-mode response starts with
pub const PLACEHOLDER_MARKER: &str = "[PLACEHOLDER LLM";

/// Requested summary length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// 2-3 key sentences
    #[default]
    Short,
    /// 1-2 paragraphs covering the major sections
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

/// Output format of the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }

    /// File name a host would save this format under
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Plain => "summary.txt",
            Self::Markdown => "summary.md",
            Self::Html => "summary.html",
        }
    }

    /// MIME type for downloads
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Plain => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Html => "text/html",
        }
    }
}

/// Creativity level, mapped onto a sampling temperature.
///
/// Unrecognized labels deserialize to [`Creativity::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Creativity {
    Low,
    #[default]
    Medium,
    High,
}

impl Creativity {
    /// Sampling temperature for this level
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Low => 0.2,
            Self::Medium => 0.5,
            Self::High => 0.8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a label leniently; anything unknown is `Medium`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl From<String> for Creativity {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Caller-chosen summary configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryOptions {
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub creativity: Creativity,
}

impl SummaryOptions {
    pub fn new(length: SummaryLength, format: OutputFormat, creativity: Creativity) -> Self {
        Self {
            length,
            format,
            creativity,
        }
    }

    /// Fixed configuration used for per-chunk summaries
    pub fn intermediate() -> Self {
        Self::new(SummaryLength::Short, OutputFormat::Plain, Creativity::Low)
    }
}

/// One call's worth of work for the completion client
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub text: String,
    pub options: SummaryOptions,
    pub model_id: String,
    pub intermediate: bool,
}

impl CompletionRequest {
    /// Request for a direct or final summary
    pub fn final_summary(text: impl Into<String>, options: SummaryOptions, model_id: &str) -> Self {
        Self {
            text: text.into(),
            options,
            model_id: model_id.to_string(),
            intermediate: false,
        }
    }

    /// Request for one chunk's intermediate summary
    pub fn chunk_summary(text: impl Into<String>, model_id: &str) -> Self {
        Self {
            text: text.into(),
            options: SummaryOptions::intermediate(),
            model_id: model_id.to_string(),
            intermediate: true,
        }
    }
}

/// How a summary was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Direct,
    Chunked,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Chunked => "chunked",
        }
    }
}

/// What happened to one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum ChunkOutcome {
    Summarized,
    NoData,
    Failed(String),
}

impl ChunkOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Summarized => "summarized",
            Self::NoData => "no_data",
            Self::Failed(_) => "failed",
        }
    }
}

/// Final result of one summarization run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub text: String,
    pub strategy: Strategy,
    pub total_tokens: usize,
    /// Chunks produced by the splitter (0 on the direct path)
    pub chunk_count: usize,
    /// Chunks whose intermediate summary went into the final call
    pub used_chunks: usize,
    /// One line per chunk that failed and was skipped
    pub warnings: Vec<String>,
}

impl Summary {
    /// Whether the text came from placeholder mode rather than a model
    pub fn is_placeholder(&self) -> bool {
        self.text.starts_with(PLACEHOLDER_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creativity_temperature() {
        assert_eq!(Creativity::Low.temperature(), 0.2);
        assert_eq!(Creativity::Medium.temperature(), 0.5);
        assert_eq!(Creativity::High.temperature(), 0.8);
    }

    #[test]
    fn test_creativity_unknown_label_defaults_to_medium() {
        assert_eq!(Creativity::from_label("HIGH"), Creativity::High);
        assert_eq!(Creativity::from_label("wild"), Creativity::Medium);

        let parsed: Creativity = serde_json::from_str("\"extreme\"").unwrap();
        assert_eq!(parsed, Creativity::Medium);
        assert_eq!(parsed.temperature(), 0.5);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SummaryOptions =
            serde_json::from_str(r#"{"length":"long","format":"html"}"#).unwrap();
        assert_eq!(options.length, SummaryLength::Long);
        assert_eq!(options.format, OutputFormat::Html);
        assert_eq!(options.creativity, Creativity::Medium);
    }

    #[test]
    fn test_chunk_request_forces_intermediate_options() {
        let request = CompletionRequest::chunk_summary("text", "model");
        assert!(request.intermediate);
        assert_eq!(request.options.length, SummaryLength::Short);
        assert_eq!(request.options.format, OutputFormat::Plain);
        assert_eq!(request.options.creativity, Creativity::Low);
    }

    #[test]
    fn test_format_download_metadata() {
        assert_eq!(OutputFormat::Markdown.file_name(), "summary.md");
        assert_eq!(OutputFormat::Html.mime_type(), "text/html");
    }
}

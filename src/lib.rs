//! Adaptive map-reduce text summarization
//!
//! Short texts are summarized with a single completion call. Longer texts are
//! split into overlapping chunks, each chunk is summarized, and the
//! intermediate summaries are merged by one final call. The crate also ships
//! an axum service exposing the pipeline over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod metrics;
pub mod observability;
pub mod pipeline;

pub use config::Settings;
pub use error::{ErrorKind, Result, SummaryError};
pub use pipeline::{
    Creativity, OutputFormat, ProgressEvent, ProgressObserver, Summary, SummaryLength,
    SummaryOptions, SummaryPipeline,
};

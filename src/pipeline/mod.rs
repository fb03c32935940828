//! Adaptive map-reduce summarization pipeline
//!
//! Provides:
//! - Token counting with a word-count fallback
//! - Boundary-aware chunking with overlap
//! - Prompt construction for direct, intermediate and final calls
//! - The orchestrator that picks a strategy and runs it

pub mod budget;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod prompts;
pub mod splitter;
pub mod tokenizer;

pub use budget::TokenBudget;
pub use models::{
    ChunkOutcome, CompletionRequest, Creativity, OutputFormat, Strategy, Summary, SummaryLength,
    SummaryOptions,
};
pub use orchestrator::SummaryPipeline;
pub use progress::{ChannelObserver, NoopObserver, ProgressEvent, ProgressObserver, TracingObserver};
pub use splitter::{Chunk, TextSplitter};
pub use tokenizer::Tokenizer;

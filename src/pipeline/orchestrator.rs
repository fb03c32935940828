//! Map-reduce summarization
//!
//! Short inputs are summarized in one call. Longer inputs are split into
//! overlapping chunks, each chunk is summarized on its own (sequentially, in
//! order), and the joined intermediate summaries are summarized once more
//! with the caller's options.

use super::budget::TokenBudget;
use super::models::{ChunkOutcome, CompletionRequest, Strategy, Summary, SummaryOptions};
use super::progress::{ProgressEvent, ProgressObserver};
use super::prompts::is_no_data;
use super::splitter::TextSplitter;
use super::tokenizer::Tokenizer;
use crate::error::{ErrorKind, Result, SummaryError};
use crate::llm::Completer;
use crate::metrics::METRICS;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Joins intermediate summaries before the final call
pub const SUMMARY_SEPARATOR: &str = "\n\n---\n\n";

/// Summarization pipeline
pub struct SummaryPipeline {
    tokenizer: Tokenizer,
    completer: Arc<dyn Completer>,
    budget: TokenBudget,
}

impl SummaryPipeline {
    /// Create a pipeline; fails if the budget is unusable
    pub fn new(tokenizer: Tokenizer, completer: Arc<dyn Completer>, budget: TokenBudget) -> Result<Self> {
        budget.validate()?;
        Ok(Self {
            tokenizer,
            completer,
            budget,
        })
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Summarize `text` with `model_id`, reporting progress to `observer`
    pub async fn summarize(
        &self,
        text: &str,
        options: &SummaryOptions,
        model_id: &str,
        observer: &dyn ProgressObserver,
    ) -> Result<Summary> {
        let span = info_span!("summarize", run_id = %Uuid::new_v4(), model = model_id);
        self.run(text, options, model_id, observer)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        text: &str,
        options: &SummaryOptions,
        model_id: &str,
        observer: &dyn ProgressObserver,
    ) -> Result<Summary> {
        if model_id.trim().is_empty() {
            return Err(SummaryError::MissingModel);
        }
        if text.trim().is_empty() {
            return Err(SummaryError::EmptyInput);
        }

        let total_tokens = self.tokenizer.count_tokens(text);
        let strategy = if self.budget.fits_direct(total_tokens) {
            Strategy::Direct
        } else {
            Strategy::Chunked
        };

        info!(
            "Input has {} tokens ({} mode), threshold {}: {} strategy",
            total_tokens,
            self.tokenizer.mode(),
            self.budget.token_threshold,
            strategy.as_str()
        );
        METRICS.record_run(strategy.as_str(), total_tokens);
        observer.on_event(&ProgressEvent::StrategySelected {
            strategy,
            total_tokens,
        });

        match strategy {
            Strategy::Direct => {
                let request = CompletionRequest::final_summary(text, *options, model_id);
                let text = self.completer.complete(&request).await?;
                Ok(Summary {
                    text,
                    strategy,
                    total_tokens,
                    chunk_count: 0,
                    used_chunks: 0,
                    warnings: Vec::new(),
                })
            }
            Strategy::Chunked => {
                self.summarize_chunked(text, options, model_id, total_tokens, observer)
                    .await
            }
        }
    }

    async fn summarize_chunked(
        &self,
        text: &str,
        options: &SummaryOptions,
        model_id: &str,
        total_tokens: usize,
        observer: &dyn ProgressObserver,
    ) -> Result<Summary> {
        let splitter = TextSplitter::new(
            self.tokenizer.clone(),
            self.budget.chunk_target_tokens,
            self.budget.chunk_overlap_tokens,
        );
        let chunks = splitter.split_chunks(text);
        if chunks.is_empty() {
            error!("Splitter produced no chunks for {} tokens", total_tokens);
            return Err(SummaryError::Unsplittable);
        }

        let total = chunks.len();
        observer.on_event(&ProgressEvent::ChunksPlanned { count: total });

        let mut summaries = Vec::with_capacity(total);
        let mut warnings = Vec::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            observer.on_event(&ProgressEvent::ChunkStarted {
                index,
                total,
                tokens: chunk.token_count,
            });
            debug!(
                "Chunk {}/{}: start={}, tokens={}",
                index + 1,
                total,
                chunk.start,
                chunk.token_count
            );

            let request = CompletionRequest::chunk_summary(chunk.text, model_id);
            let outcome = match self.completer.complete(&request).await {
                Ok(result) if result.trim().is_empty() || is_no_data(&result) => {
                    debug!("Chunk {}/{} has no useful content", index + 1, total);
                    ChunkOutcome::NoData
                }
                Ok(result) => {
                    summaries.push(result);
                    ChunkOutcome::Summarized
                }
                // Every later call would fail the same way
                Err(e) if e.kind() == ErrorKind::Configuration => {
                    error!("Aborting run on configuration error: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    let warning = format!("Chunk {}/{} skipped: {}", index + 1, total, e);
                    warn!("{}", warning);
                    warnings.push(warning);
                    ChunkOutcome::Failed(e.to_string())
                }
            };

            METRICS.record_chunk(outcome.label());
            observer.on_event(&ProgressEvent::ChunkFinished {
                index,
                total,
                outcome,
            });
        }

        if summaries.is_empty() {
            error!("No usable intermediate summaries from {} chunks", total);
            return Err(SummaryError::NoIntermediateSummaries);
        }

        let used_chunks = summaries.len();
        let mut combined = summaries.join(SUMMARY_SEPARATOR);
        let combined_tokens = self.tokenizer.count_tokens(&combined);

        if self.budget.needs_rebound(combined_tokens) {
            combined = self.rebound(&combined);
            let to_tokens = self.tokenizer.count_tokens(&combined);
            METRICS.record_rebound();
            observer.on_event(&ProgressEvent::CombinedTruncated {
                from_tokens: combined_tokens,
                to_tokens,
            });
        }

        observer.on_event(&ProgressEvent::FinalStarted {
            summaries: used_chunks,
        });
        let request = CompletionRequest::final_summary(combined, *options, model_id);
        let text = self.completer.complete(&request).await?;

        info!(
            "Final summary built from {}/{} chunks ({} skipped)",
            used_chunks,
            total,
            warnings.len()
        );

        Ok(Summary {
            text,
            strategy: Strategy::Chunked,
            total_tokens,
            chunk_count: total,
            used_chunks,
            warnings,
        })
    }

    /// Bound the combined intermediate text before the final call.
    ///
    /// Text within `token_threshold × 1.5` tokens is returned unchanged.
    /// Longer text keeps its first `token_threshold × 1.4` tokens; in word mode
    /// it keeps `token_threshold × 1.4 × 4` characters instead, which only
    /// approximates that token count.
    pub fn rebound(&self, combined: &str) -> String {
        let tokens = self.tokenizer.count_tokens(combined);
        if !self.budget.needs_rebound(tokens) {
            return combined.to_string();
        }

        if self.tokenizer.is_exact() {
            let truncated = self
                .tokenizer
                .truncate(combined, self.budget.rebound_target_tokens());
            if !truncated.is_empty() {
                return truncated;
            }
            warn!("Token truncation failed, falling back to character truncation");
        }

        combined
            .chars()
            .take(self.budget.rebound_target_chars())
            .collect()
    }
}

//! Progress reporting for summarization runs
//!
//! The pipeline reports what it is doing through a [`ProgressObserver`]; hosts
//! bind it to whatever they display. Closures, channels and a tracing logger
//! are supported out of the box.

use super::models::{ChunkOutcome, Strategy};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Progress events, in the order a run emits them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    StrategySelected {
        strategy: Strategy,
        total_tokens: usize,
    },
    ChunksPlanned {
        count: usize,
    },
    ChunkStarted {
        index: usize,
        total: usize,
        tokens: usize,
    },
    ChunkFinished {
        index: usize,
        total: usize,
        outcome: ChunkOutcome,
    },
    CombinedTruncated {
        from_tokens: usize,
        to_tokens: usize,
    },
    FinalStarted {
        summaries: usize,
    },
}

/// Receives progress events from a run
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Logs events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StrategySelected {
                strategy,
                total_tokens,
            } => info!("Using {} strategy for {} tokens", strategy.as_str(), total_tokens),
            ProgressEvent::ChunksPlanned { count } => info!("Text split into {} chunks", count),
            ProgressEvent::ChunkStarted {
                index,
                total,
                tokens,
            } => info!("Summarizing chunk {}/{} ({} tokens)", index + 1, total, tokens),
            ProgressEvent::ChunkFinished {
                index,
                total,
                outcome: ChunkOutcome::Failed(reason),
            } => warn!("Chunk {}/{} failed: {}", index + 1, total, reason),
            ProgressEvent::ChunkFinished { .. } => {}
            ProgressEvent::CombinedTruncated {
                from_tokens,
                to_tokens,
            } => warn!(
                "Combined intermediate summaries truncated from {} to {} tokens",
                from_tokens, to_tokens
            ),
            ProgressEvent::FinalStarted { summaries } => {
                info!("Building final summary from {} intermediate summaries", summaries)
            }
        }
    }
}

/// Forwards events to an unbounded channel; a closed receiver is ignored
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_event(&self, event: &ProgressEvent) {
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_observer() {
        let seen = Mutex::new(Vec::new());
        let observer = |event: &ProgressEvent| seen.lock().unwrap().push(event.clone());
        observer.on_event(&ProgressEvent::ChunksPlanned { count: 3 });
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[ProgressEvent::ChunksPlanned { count: 3 }]
        );
    }

    #[tokio::test]
    async fn test_channel_observer() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = ChannelObserver::new(tx);
        observer.on_event(&ProgressEvent::FinalStarted { summaries: 2 });
        assert_eq!(rx.recv().await, Some(ProgressEvent::FinalStarted { summaries: 2 }));

        drop(rx);
        // Sending after the receiver is gone must not panic
        observer.on_event(&ProgressEvent::FinalStarted { summaries: 2 });
    }

    #[test]
    fn test_event_serialization() {
        let event = ProgressEvent::ChunkFinished {
            index: 1,
            total: 3,
            outcome: ChunkOutcome::Failed("timeout".into()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "chunk_finished");
        assert_eq!(json["outcome"]["status"], "failed");
    }
}

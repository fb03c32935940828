//! HTTP API for the summarization pipeline

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use routes::build_router;

use crate::config::Settings;
use crate::error::Result;
use crate::extract::ExtractionClient;
use crate::llm::{CompletionClient, ModelRoster};
use crate::pipeline::{SummaryPipeline, Tokenizer};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Build the shared state from loaded settings
pub fn init_state(settings: Settings) -> Result<AppState> {
    let Settings {
        provider,
        extraction,
        pipeline,
        roster_path,
        ..
    } = settings;

    let roster = ModelRoster::load(roster_path.as_deref().map(Path::new));
    let completer = CompletionClient::new(provider)?;
    let offline = completer.is_offline();
    if offline {
        info!("Placeholder mode enabled, no provider calls will be made");
    }
    let pipeline = SummaryPipeline::new(Tokenizer::cl100k(), Arc::new(completer), pipeline)?;
    let extractor = ExtractionClient::new(extraction)?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        extractor: Arc::new(extractor),
        roster: Arc::new(roster),
        offline,
    })
}

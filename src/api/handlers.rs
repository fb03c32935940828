//! HTTP handlers

use super::models::{
    ApiError, HealthResponse, ModelsResponse, SummarizeRequest, SummarizeResponse,
    INVALID_REQUEST,
};
use crate::error::{ErrorKind, SummaryError};
use crate::extract::ExtractionClient;
use crate::llm::ModelRoster;
use crate::metrics::METRICS;
use crate::pipeline::{SummaryPipeline, TracingObserver};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SummaryPipeline>,
    pub extractor: Arc<ExtractionClient>,
    pub roster: Arc<ModelRoster>,
    pub offline: bool,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// HTTP status for a pipeline error
pub fn status_for(err: &SummaryError) -> StatusCode {
    match err {
        SummaryError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        SummaryError::EmptyInput => StatusCode::BAD_REQUEST,
        _ => match err.kind() {
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Provider => StatusCode::BAD_GATEWAY,
            ErrorKind::Content => StatusCode::UNPROCESSABLE_ENTITY,
        },
    }
}

fn error_response(err: SummaryError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Summarize request failed: {}", err);
    } else {
        warn!("Summarize request rejected: {}", err);
    }
    (status, Json(ApiError::from(&err)))
}

fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    let status = rejection.status();
    let message = rejection.body_text();
    warn!("Rejected malformed request body: {}", message);
    (
        status,
        Json(ApiError::new(INVALID_REQUEST, ErrorKind::Content, message)),
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Summarize text or a web page
///
/// POST /api/v1/summarize
pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> ApiResult<SummarizeResponse> {
    let Json(request) = payload.map_err(rejection_response)?;
    let options = request.options();
    let model_id = non_blank(request.model_id)
        .unwrap_or_else(|| state.roster.default_model().model_id.clone());
    if state.roster.find(&model_id).is_none() {
        debug!("Model {} is not in the roster", model_id);
    }

    let text = match (non_blank(request.text), non_blank(request.url)) {
        (Some(text), _) => text,
        (None, Some(url)) => {
            info!("Summarize request for url={}", url);
            state.extractor.extract(&url).await.map_err(error_response)?
        }
        (None, None) => return Err(error_response(SummaryError::EmptyInput)),
    };

    info!(
        "Summarize request: chars={}, model={}, length={}, format={}, creativity={}",
        text.len(),
        model_id,
        options.length.as_str(),
        options.format.as_str(),
        options.creativity.as_str()
    );

    let summary = state
        .pipeline
        .summarize(&text, &options, &model_id, &TracingObserver)
        .await
        .map_err(error_response)?;

    Ok(Json(SummarizeResponse::new(summary, options.format)))
}

/// List selectable models
///
/// GET /api/v1/models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.roster.models().to_vec(),
        default_model: state.roster.default_model().model_id.clone(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        tokenizer: state.pipeline.tokenizer().mode().to_string(),
        offline: state.offline,
        models: state.roster.models().len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Prometheus metrics
///
/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&SummaryError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&SummaryError::Timeout { seconds: 1 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&SummaryError::Network("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&SummaryError::MissingCredential),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&SummaryError::NoIntermediateSummaries),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&SummaryError::ExtractionFailed("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}

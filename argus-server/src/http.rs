//! HTTP transport adapter: JSON endpoints over the shared service

use crate::service::PredictionService;
use argus_core::{BatchItem, Detection, Error, PredictionOptions, DEFAULT_CONFIDENCE_THRESHOLD};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

// API state
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<PredictionService>,
}

// Request types
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictWithOptionsRequest {
    pub url: String,
    pub confidence_threshold: Option<f32>,
    pub max_objects: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictRequest {
    pub urls: Vec<String>,
}

// Response types
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub objects: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictWithConfidenceResponse {
    pub objects: Vec<Detection>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// Map a domain error to its HTTP shape: caller-input problems become 400,
/// everything else 500. Internal failures are logged here, at the edge.
fn error_reply(e: Error) -> ErrorReply {
    let (status, code) = if e.is_invalid_input() {
        (StatusCode::BAD_REQUEST, "INVALID_INPUT")
    } else {
        error!("request failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            code: code.to_string(),
        }),
    )
}

/// Create the HTTP router with all API routes
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/model/info", get(model_info_handler))
        // Metrics (Prometheus format)
        .route("/metrics", get(metrics_handler))
        .route("/predict", post(predict_handler))
        .route("/predict_with_confidence", post(predict_with_confidence_handler))
        .route("/predict_with_options", post(predict_with_options_handler))
        .route("/batch_predict", post(batch_predict_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.service.health())
}

async fn model_info_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.service.model_info())
}

async fn metrics_handler(State(state): State<ApiState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.service.metrics().render(),
    )
}

async fn predict_handler(
    State(state): State<ApiState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ErrorReply> {
    let objects = state
        .service
        .predict(&request.url)
        .await
        .map_err(error_reply)?;
    Ok(Json(PredictResponse { objects }))
}

async fn predict_with_confidence_handler(
    State(state): State<ApiState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictWithConfidenceResponse>, ErrorReply> {
    let objects = state
        .service
        .predict_with_confidence(&request.url)
        .await
        .map_err(error_reply)?;
    Ok(Json(PredictWithConfidenceResponse { objects }))
}

async fn predict_with_options_handler(
    State(state): State<ApiState>,
    Json(request): Json<PredictWithOptionsRequest>,
) -> Result<Json<PredictResponse>, ErrorReply> {
    let options = PredictionOptions {
        confidence_threshold: request
            .confidence_threshold
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
        max_objects: request.max_objects,
    };
    let objects = state
        .service
        .predict_with_options(&request.url, &options)
        .await
        .map_err(error_reply)?;
    Ok(Json(PredictResponse { objects }))
}

async fn batch_predict_handler(
    State(state): State<ApiState>,
    Json(request): Json<BatchPredictRequest>,
) -> Json<BatchPredictResponse> {
    let results = state.service.batch_predict(&request.urls).await;
    Json(BatchPredictResponse { results })
}

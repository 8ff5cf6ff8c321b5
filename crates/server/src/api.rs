//! HTTP API for risk prediction, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use risk_lib::{
    models::{utc_timestamp, RiskLabel, RiskProbabilities, VitalSigns},
    HealthReport, RiskScorer, ScoreError, ServiceMetrics,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state, constructed once at startup
///
/// The scorer is read-only; concurrent requests share it without locking.
pub struct AppState {
    pub scorer: RiskScorer,
    pub metrics: ServiceMetrics,
}

impl AppState {
    pub fn new(scorer: RiskScorer, metrics: ServiceMetrics) -> Self {
        Self { scorer, metrics }
    }
}

/// Body of a successful prediction
#[derive(Debug, Serialize)]
struct PredictResponse {
    risk_level: RiskLabel,
    confidence: f64,
    probabilities: RiskProbabilities,
    input: VitalSigns,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Health check endpoint - always 200, degraded state shows in the body
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthReport::new(state.scorer.model_loaded()))
}

/// Risk prediction endpoint
async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let start = Instant::now();

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            state.metrics.inc_validation_errors();
            return error_response(&ScoreError::InvalidValue(rejection.body_text()));
        }
    };

    match state.scorer.score(&body) {
        Ok((input, result)) => {
            state
                .metrics
                .observe_prediction_latency(start.elapsed().as_secs_f64());
            state.metrics.inc_predictions(result.risk_level.name());
            info!(
                risk_level = %result.risk_level,
                confidence = result.confidence,
                "Prediction served"
            );
            (
                StatusCode::OK,
                Json(PredictResponse {
                    risk_level: result.risk_level,
                    confidence: result.confidence,
                    probabilities: result.probabilities,
                    input,
                    timestamp: utc_timestamp(),
                }),
            )
                .into_response()
        }
        Err(error) => {
            if error.is_client_error() {
                state.metrics.inc_validation_errors();
            } else {
                state.metrics.inc_prediction_errors();
            }
            error_response(&error)
        }
    }
}

/// Map a scoring error to its HTTP status and JSON body
fn error_response(error: &ScoreError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Web interface (presentation-layer template)
async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Service description endpoint
async fn api_info() -> impl IntoResponse {
    Json(json!({
        "service": "Patient Risk Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/": "GET - Web interface",
            "/health": "GET - Health check",
            "/predict": "POST - Predict patient risk level",
            "/api": "GET - Service description",
            "/metrics": "GET - Prometheus metrics"
        }
    }))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/api", get(api_info))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(bind_address: String, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", bind_address, port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

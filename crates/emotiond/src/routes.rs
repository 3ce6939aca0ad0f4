//! API routes for emotiond

use crate::error::AnalyzeError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use emotion_common::{
    normalize_with_stage, AnalysisResult, AnalyzeRequest, HealthResponse, ANALYZE_PATH,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Analyze Routes
// ============================================================================

pub fn analyze_routes() -> Router<AppStateArc> {
    Router::new().route(ANALYZE_PATH, post(analyze_emotion))
}

async fn analyze_emotion(
    State(state): State<AppStateArc>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AnalyzeError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("  Rejected analyze body: {}", rejection.body_text());
        state.metrics.record_request("unknown", "invalid_request");
        AnalyzeError::InvalidRequest(rejection.body_text())
    })?;

    let span = info_span!("analyze", request_id = %Uuid::new_v4(), mode = %req.mode);
    analyze(state, req).instrument(span).await
}

async fn analyze(state: AppStateArc, req: AnalyzeRequest) -> Result<Json<AnalysisResult>, AnalyzeError> {
    let mode = req.mode.as_str();
    let started = Instant::now();

    let raw = match state.dispatcher.dispatch(req.mode, &req.input).await {
        Ok(raw) => raw,
        Err(e) => {
            match &e {
                AnalyzeError::RateLimited | AnalyzeError::PaymentRequired => {
                    warn!("  Analysis refused upstream: {}", e)
                }
                _ => error!("  Analysis failed: {}", e),
            }
            state.metrics.record_request(mode, e.outcome());
            return Err(e);
        }
    };
    state
        .metrics
        .observe_upstream_latency(started.elapsed().as_secs_f64());

    let normalized = normalize_with_stage(&raw);
    state.metrics.record_stage(normalized.stage);
    state.metrics.record_request(mode, "ok");

    let elapsed_ms = started.elapsed().as_millis() as u64;
    if normalized.stage.is_fallback() {
        warn!(elapsed_ms, "  Analysis complete with Neutral default");
    } else {
        info!(
            emotion = %normalized.result.emotion,
            confidence = normalized.result.confidence,
            stage = normalized.stage.as_str(),
            elapsed_ms,
            "  Analysis complete"
        );
    }
    Ok(Json(normalized.result))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let status = if state.dispatcher.has_credential() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: state.dispatcher.model().to_string(),
    })
}

// ============================================================================
// Metrics Routes
// ============================================================================

pub fn metrics_routes() -> Router<AppStateArc> {
    Router::new().route("/metrics", get(metrics))
}

async fn metrics(State(state): State<AppStateArc>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("  Failed to render metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

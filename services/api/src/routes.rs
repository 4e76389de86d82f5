use crate::infra::{parse_profile, AppState};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use ev_siting::error::AppError;
use ev_siting::feasibility::{
    EvaluationOutcome, FeasibilityVerdict, SiteFeasibilityService, UnresolvedReason,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct FeasibilityRequest {
    pub(crate) address: String,
    #[serde(default)]
    pub(crate) profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeasibilityResponse {
    pub(crate) evaluated_at: DateTime<Utc>,
    pub(crate) verdict: FeasibilityVerdict,
}

#[derive(Debug, Serialize)]
pub(crate) struct UnresolvedResponse {
    pub(crate) address: String,
    pub(crate) reason: UnresolvedReason,
    pub(crate) message: String,
}

pub(crate) fn with_feasibility_routes(service: Arc<SiteFeasibilityService>) -> Router {
    Router::new()
        .route("/api/v1/feasibility", post(feasibility_endpoint))
        .layer(Extension(service))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Unresolved addresses answer 422 so callers never mistake them for a failed site.
/// Malformed bodies answer 400 and never share that status.
pub(crate) async fn feasibility_endpoint(
    Extension(service): Extension<Arc<SiteFeasibilityService>>,
    payload: Result<Json<FeasibilityRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let profile = match payload.profile.as_deref() {
        Some(raw) => parse_profile(raw).map_err(AppError::InvalidRequest)?,
        None => service.default_profile(),
    };

    let response = match service.evaluate_profile(&payload.address, profile).await {
        EvaluationOutcome::Evaluated(verdict) => (
            StatusCode::OK,
            Json(FeasibilityResponse {
                evaluated_at: Utc::now(),
                verdict,
            }),
        )
            .into_response(),
        EvaluationOutcome::Unresolved { address, reason } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(UnresolvedResponse {
                address,
                message: reason.summary(),
                reason,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

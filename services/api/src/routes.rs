use crate::infra::AppState;
use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use seatcheck::assignments::{
    AssignmentImportError, AssignmentImporter, CheckView, ValidationEngine, ValidationPolicy,
    ValidationResult,
};
use seatcheck::error::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct ValidationResponse {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) result: ValidationResult,
    pub(crate) checks: Vec<CheckView>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assignments/validate", post(validate_endpoint))
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

/// Accepts a plan document; object-form plans may carry a `policy` override.
pub(crate) async fn validate_endpoint(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<ValidationResponse>, AppError> {
    let plan = AssignmentImporter::from_slice(&body)?;

    let result = match requested_policy(&body)? {
        Some(policy) => ValidationEngine::new(policy).validate_plan(&plan),
        None => state.engine.validate_plan(&plan),
    };

    info!(
        sessions = plan.assignments.sessions().len(),
        satisfied = result.all_constraints_satisfied,
        violations = result.violations.len(),
        "validation request served"
    );

    Ok(Json(ValidationResponse {
        generated_at: Utc::now(),
        checks: result.checks(),
        result,
    }))
}

fn requested_policy(body: &[u8]) -> Result<Option<ValidationPolicy>, AssignmentImportError> {
    let document: serde_json::Value = serde_json::from_slice(body)?;
    match document.get("policy") {
        Some(policy) if !policy.is_null() => Ok(Some(serde_json::from_value(policy.clone())?)),
        _ => Ok(None),
    }
}

//! HTTP request handlers

use super::types::*;
use super::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

const INPUT_REQUIRED: &str = "input_data object is required";
const CREDENTIALS_MISSING: &str = "PhenoML credentials are not configured";
const EXECUTION_FAILED: &str = "Workflow execution failed";

/// Create the proxy router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/execute-workflow", post(execute_workflow))
        .route("/health", get(health))
        .with_state(state)
}

async fn execute_workflow(
    State(state): State<AppState>,
    body: Result<Json<ExecuteWorkflowRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected workflow request body");
        AppError::BadRequest(INPUT_REQUIRED.to_string())
    })?;

    let input_data = req
        .input_object()
        .cloned()
        .ok_or_else(|| AppError::BadRequest(INPUT_REQUIRED.to_string()))?;

    let workflows = state
        .workflows
        .as_ref()
        .ok_or_else(|| AppError::Internal(CREDENTIALS_MISSING.to_string()))?;

    match workflows.execute(input_data).await {
        Ok(result) => {
            tracing::info!("Workflow executed");
            Ok(Json(result))
        }
        Err(e) => {
            tracing::error!(error = %e, "Workflow execution failed");
            Err(AppError::Upstream(e.to_string()))
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
    /// Remote workflow call failed; carries the failure detail
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg)),
            AppError::Upstream(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(EXECUTION_FAILED).with_message(detail),
            ),
        };

        (status, Json(body)).into_response()
    }
}

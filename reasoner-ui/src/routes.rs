//! HTTP route handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use reasoner::core::types::RunResult;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/solve", post(solve))
}

/// GET / - the single-page front-end.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub backend: &'static str,
    pub max_retries: u32,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.orchestrator.model().to_string(),
        backend: state.backend,
        max_retries: state.orchestrator.max_retries(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub question: String,
}

/// Error body: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// POST /api/solve - runs the full retry loop on the blocking pool.
pub async fn solve(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<RunResult>, ApiError> {
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "question must be non-empty".to_string(),
        });
    }

    info!(question_bytes = question.len(), "solve requested");
    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || orchestrator.solve(&question))
        .await
        .map_err(|err| {
            error!(err = %err, "solve task failed");
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "internal error while solving".to_string(),
            }
        })?;
    info!(status = %result.status, retries = result.metadata.retries, "solve finished");
    Ok(Json(result))
}

//! HTTP handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use super::types::{ErrorResponse, HealthResponse, QueryRequest, QueryResponse};
use super::AppState;
use crate::core::AnalystError;

/// Agent failure turned into a JSON error response
#[derive(Debug)]
pub struct ApiError(AnalystError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<AnalystError> for ApiError {
    fn from(err: AnalystError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), "Request failed: {}", self.0);
        let body = ErrorResponse {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub async fn query_agent(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let (session_id, transcript) = state
        .sessions
        .get_or_create(request.session_id.as_deref())
        .await;

    // Held for the whole turn so requests to one session run one at a time
    let mut transcript = transcript.lock().await;
    info!(
        session_id = %session_id,
        history = transcript.len(),
        "Answering question"
    );

    let answer = state.agent.respond(&request.question, &mut transcript).await?;

    Ok(Json(QueryResponse { answer, session_id }))
}

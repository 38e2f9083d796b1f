use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Lookup failures from the session store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found")]
    NotFound { session_id: String },
}

/// Failures of the external generation path.
///
/// These never reach HTTP clients: the decision engine maps every variant
/// to the fallback heuristic.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no text generation provider configured")]
    NotConfigured,

    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation provider returned no text")]
    EmptyReply,

    #[error("generation reply does not match schema: {0}")]
    MalformedReply(String),
}

/// Errors surfaced to HTTP clients as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::MalformedInput(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Catalog or similarity data could not be loaded. Fatal at startup.
    #[error("Load error: {0}")]
    Load(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Poster metadata request failed (non-2xx, exhausted retries, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Metadata response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Network(_) | AppError::Parse(_) | AppError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Load(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

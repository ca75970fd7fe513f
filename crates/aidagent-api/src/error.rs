use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use aidagent_core::{AlertError, ChatError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Chat session not found")]
    SessionNotFound,

    #[error("Responder unavailable: {0}")]
    ResponderUnavailable(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Missing or malformed bearer credential")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Store(#[from] aidagent_persist::StoreError),
}

impl From<AlertError> for ApiError {
    fn from(err: AlertError) -> Self {
        match err {
            AlertError::NotFound(id) => ApiError::AlertNotFound(id),
            AlertError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::AlertNotFound(id) => ApiError::AlertNotFound(id),
            ChatError::SessionNotFound { .. } => ApiError::SessionNotFound,
            ChatError::ResponderUnavailable(reason) => ApiError::ResponderUnavailable(reason),
            ChatError::Store(e) => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::AlertNotFound(_) | ApiError::SessionNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::ResponderUnavailable(ref reason) => {
                tracing::error!("Responder error: {}", reason);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            ApiError::Store(ref e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

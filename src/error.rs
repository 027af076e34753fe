//! Error types for the backend client and the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message shown when a session could not be delivered to the backend
pub const GENERIC_SAVE_FAILURE: &str = "Failed to save study session";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

impl BackendError {
    /// Text to surface to the user for a failed session save
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Rejected(message) => message.clone(),
            BackendError::Transport(_) => GENERIC_SAVE_FAILURE.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Unknown topic: {0}")]
    UnknownTopic(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::UnknownTopic(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_verbatim() {
        let err = BackendError::Rejected("Usuário não autenticado".to_string());
        assert_eq!(err.user_message(), "Usuário não autenticado");
    }

    #[test]
    fn api_errors_map_to_status_codes() {
        let unknown = ApiError::UnknownTopic(9).into_response();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let rejected = ApiError::from(BackendError::Rejected("nope".to_string())).into_response();
        assert_eq!(rejected.status(), StatusCode::BAD_GATEWAY);

        let internal = ApiError::Internal("poisoned".to_string()).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

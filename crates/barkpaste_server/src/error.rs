//! Mapping from core errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use barkpaste_core::AppError;
use serde_json::json;

/// Handler error wrapper that renders an [`AppError`] as a JSON response.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl HttpError {
    /// Status code and client-facing message for the wrapped error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Exists => (
                StatusCode::CONFLICT,
                "A paste with this id already exists".to_string(),
            ),
            AppError::TooBig => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Paste exceeds the anonymous size limit".to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(_) | AppError::StorageMessage(_) | AppError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {:?}", self.0);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_errors_map_to_distinct_statuses() {
        let cases = [
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::Exists, StatusCode::CONFLICT),
            (AppError::TooBig, StatusCode::PAYLOAD_TOO_LARGE),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                AppError::InvalidRequest("bad ttl".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::StorageMessage("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError(err).status_and_message().0, expected);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let (_, message) =
            HttpError(AppError::StorageMessage("secret path".to_string())).status_and_message();
        assert!(!message.contains("secret"));
    }
}

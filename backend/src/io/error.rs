use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error bodies.
/// Absence of authorization is an error; absence of an entry row is not —
/// lookup handlers answer `200 {entry: null}` and never construct this
/// type for a missing entry.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No or invalid bearer credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but insufficiently privileged.
    #[error("{0}")]
    Forbidden(String),

    /// Malformed or missing request data.
    #[error("{0}")]
    Validation(String),

    /// A referenced resource (profile, user) does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// A store or other internal failure. Logged server-side; the client
    /// receives a generic message.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

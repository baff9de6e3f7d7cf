use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dealsync_core::SyncError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(SyncError::MissingConfig(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<SyncError>() {
            match e {
                // An upstream API said no — our side is fine.
                SyncError::Remote { .. } => StatusCode::BAD_GATEWAY,
                SyncError::MissingConfig(_) => StatusCode::BAD_REQUEST,
                SyncError::Http(_) | SyncError::Io(_) | SyncError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

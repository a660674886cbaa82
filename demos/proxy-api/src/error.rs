use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use income_explorer::DataFetchError;
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn gateway_timeout(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DataFetchError> for AppError {
    fn from(e: DataFetchError) -> Self {
        match &e {
            DataFetchError::Timeout(_) => AppError::gateway_timeout(e.to_string()),
            DataFetchError::Http(err) if err.is_timeout() => {
                AppError::gateway_timeout(e.to_string())
            }
            DataFetchError::Http(_)
            | DataFetchError::Status { .. }
            | DataFetchError::Json(_)
            | DataFetchError::Schema { .. } => AppError::bad_gateway(e.to_string()),
            _ => AppError::internal(e.to_string()),
        }
    }
}

use crate::utils::error::{ErrorCategory, ImportError};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// HTTP 層的錯誤包裝，依錯誤分類決定狀態碼
#[derive(Debug)]
pub struct ApiError(pub ImportError);

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if let ImportError::UploadTooLargeError { .. } = self.0 {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }

        match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Authentication => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::Remote => StatusCode::BAD_GATEWAY,
            ErrorCategory::Structural | ErrorCategory::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(error: ImportError) -> Self {
        ApiError(error)
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        let message = error.body_text();
        // 超過 DefaultBodyLimit 時 axum 回報 413
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError(ImportError::UploadTooLargeError { message })
        } else {
            ApiError(ImportError::UploadError { message })
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ Request failed ({}): {}", status, self.0);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self.0);
        }

        let body = ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

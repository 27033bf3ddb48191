use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use ankh_core::errors::PipelineError;

/// Wrapper so handlers can return `PipelineError` with `?`. Maps the
/// taxonomy onto HTTP statuses and emits the log line for the failure;
/// the response body carries the taxonomy message only, never raw
/// collaborator output.
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PipelineError::Validation(_) | PipelineError::UnsupportedMedia(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            PipelineError::Persistence(_) | PipelineError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if self.0.is_client_fault() {
            tracing::warn!(error = %self.0, kind = self.0.error_kind(), "request rejected");
        } else {
            tracing::error!(error = %self.0, kind = self.0.error_kind(), "request failed");
        }

        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

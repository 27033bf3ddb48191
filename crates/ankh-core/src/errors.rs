use std::time::Duration;

/// Pipeline-boundary error taxonomy. Every request failure surfaces as
/// exactly one of these; the HTTP layer maps variants to status codes.
#[derive(Clone, Debug, thiserror::Error)]
pub enum PipelineError {
    // Caller's fault
    #[error("{0}")]
    Validation(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    // Collaborator's fault
    #[error("{service} service failed: {reason}")]
    ExternalService { service: &'static str, reason: String },

    // Our fault
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::UnsupportedMedia(_) => "unsupported_media",
            Self::ExternalService { .. } => "external_service",
            Self::Persistence(_) => "persistence",
            Self::Internal(_) => "internal",
        }
    }

    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedMedia(_))
    }

    /// Fold a collaborator failure into the taxonomy, tagged with the
    /// collaborator's role. Only the sanitized reason is carried; the
    /// full error must already have been logged by the caller.
    pub fn external(service: &'static str, err: CollaboratorError) -> Self {
        Self::ExternalService {
            service,
            reason: err.public_reason(),
        }
    }
}

/// Errors produced by collaborator clients (translation, OCR). All of
/// them become `PipelineError::ExternalService` at the pipeline boundary;
/// the finer grain exists for logging.
#[derive(Clone, Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("service error {status}: {body}")]
    ServiceError { status: u16, body: String },
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("empty result")]
    EmptyResult,
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl CollaboratorError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::ServiceError { .. } => "service_error",
            Self::NetworkError(_) => "network_error",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptyResult => "empty_result",
            Self::Timeout(_) => "timeout",
        }
    }

    /// Classify a non-2xx HTTP status from a collaborator.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 | 404 | 422 => Self::InvalidRequest(body),
            _ => Self::ServiceError { status, body },
        }
    }

    /// Description safe for a response body. Upstream payloads (which may
    /// carry stack traces) never appear here, only in logs.
    pub fn public_reason(&self) -> String {
        match self {
            Self::InvalidRequest(_) => "rejected the request".to_string(),
            Self::ServiceError { status, .. } => format!("returned status {status}"),
            Self::NetworkError(_) => "unreachable".to_string(),
            Self::MalformedResponse(_) => "returned an unusable response".to_string(),
            Self::EmptyResult => "returned an empty result".to_string(),
            Self::Timeout(d) => format!("timed out after {d:?}"),
        }
    }
}

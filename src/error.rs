//! Error taxonomy for the analysis pipeline
//!
//! Errors are produced as structured variants at the point of failure
//! (HTTP status mapping happens inside the provider that made the call)
//! and propagated unchanged. Callers classify them with [`PipelineError::kind`]
//! and [`PipelineError::status_code`].

use serde::Serialize;
use thiserror::Error;

/// Errors that can terminate a pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid repository reference: {0}")]
    Validation(String),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Access to {resource} is forbidden")]
    Forbidden { resource: String },

    #[error("{service} rate limit exceeded")]
    RateLimited { service: String },

    #[error("{service} rejected the configured credentials")]
    AuthFailure { service: String },

    #[error("No files available for analysis")]
    EmptyInput,

    #[error("{service} returned a malformed response: {message}")]
    Schema { service: String, message: String },

    #[error("{service} request failed: {message}")]
    Dependency {
        service: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Stage '{stage}' ran before '{missing}' was available")]
    MissingStageOutput {
        stage: &'static str,
        missing: &'static str,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Caller-facing classification of a [`PipelineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    RateLimited,
    AuthFailure,
    EmptyInput,
    Schema,
    Dependency,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::AuthFailure => "auth_failure",
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::Schema => "schema",
            ErrorKind::Dependency => "dependency",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

impl PipelineError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        PipelineError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn forbidden(resource: impl Into<String>) -> Self {
        PipelineError::Forbidden {
            resource: resource.into(),
        }
    }

    pub fn rate_limited(service: impl Into<String>) -> Self {
        PipelineError::RateLimited {
            service: service.into(),
        }
    }

    pub fn auth_failure(service: impl Into<String>) -> Self {
        PipelineError::AuthFailure {
            service: service.into(),
        }
    }

    pub fn schema(service: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Schema {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn dependency(
        service: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        PipelineError::Dependency {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::NotFound { .. } => ErrorKind::NotFound,
            PipelineError::Forbidden { .. } => ErrorKind::Forbidden,
            PipelineError::RateLimited { .. } => ErrorKind::RateLimited,
            PipelineError::AuthFailure { .. } => ErrorKind::AuthFailure,
            PipelineError::EmptyInput => ErrorKind::EmptyInput,
            PipelineError::Schema { .. } => ErrorKind::Schema,
            PipelineError::Dependency { .. } => ErrorKind::Dependency,
            PipelineError::MissingStageOutput { .. } => ErrorKind::Internal,
        }
    }

    /// Only rate limiting is transient; everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::RateLimited { .. })
    }

    /// Errors that stop the pipeline before any later stage runs,
    /// regardless of which stage raised them.
    pub fn is_access_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::NotFound { .. } | PipelineError::Forbidden { .. }
        )
    }

    /// HTTP-style status for the web boundary
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Forbidden => 403,
            ErrorKind::RateLimited => 429,
            ErrorKind::EmptyInput => 422,
            ErrorKind::AuthFailure
            | ErrorKind::Schema
            | ErrorKind::Dependency
            | ErrorKind::Internal => 500,
        }
    }
}

/// Serializable form of a terminal error, returned to callers in place of a result
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
}

impl From<&PipelineError> for ClassifiedError {
    fn from(err: &PipelineError) -> Self {
        Self {
            kind: err.kind(),
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_come_from_variants() {
        assert_eq!(PipelineError::not_found("octo/missing").status_code(), 404);
        assert_eq!(PipelineError::forbidden("octo/private").status_code(), 403);
        assert_eq!(PipelineError::rate_limited("github").status_code(), 429);
        assert_eq!(PipelineError::Validation("x".into()).status_code(), 400);
        assert_eq!(PipelineError::EmptyInput.status_code(), 422);
        assert_eq!(PipelineError::auth_failure("openrouter").status_code(), 500);
    }

    #[test]
    fn test_message_text_does_not_drive_classification() {
        // A dependency failure whose message happens to mention 404 stays a dependency failure
        let err = PipelineError::dependency("openrouter", Some(500), "upstream said 404 not found");
        assert_eq!(err.kind(), ErrorKind::Dependency);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_only_rate_limits_are_retryable() {
        assert!(PipelineError::rate_limited("github").is_retryable());
        assert!(!PipelineError::auth_failure("github").is_retryable());
        assert!(!PipelineError::dependency("github", Some(502), "bad gateway").is_retryable());
        assert!(!PipelineError::EmptyInput.is_retryable());
    }

    #[test]
    fn test_classified_error_serializes_kind() {
        let classified = ClassifiedError::from(&PipelineError::forbidden("octo/private"));
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["kind"], "forbidden");
        assert_eq!(json["status"], 403);
    }
}

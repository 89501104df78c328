//! # Service Errors
//!
//! Failures a handler does not answer itself. Returning one from a handler
//! forwards it to the error pipeline; the handler never writes the body.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type for route handlers
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors forwarded to the error pipeline
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request body could not be read as a JSON object
    #[error("Malformed request body: {detail}")]
    MalformedBody { status: StatusCode, detail: String },

    /// Path or query string could not be read
    #[error("Invalid request: {detail}")]
    InvalidRequest { status: StatusCode, detail: String },

    /// Repository rejected the operation
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Status to answer with when the client is at fault
    pub fn client_status(&self) -> Option<StatusCode> {
        match self {
            ServiceError::MalformedBody { status, .. } | ServiceError::InvalidRequest { status, .. }
                if status.is_client_error() =>
            {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Short classification used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::MalformedBody { .. } | ServiceError::InvalidRequest { .. } => "client",
            ServiceError::Repository(_) => "repository",
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::MalformedBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

/// Marker placed in response extensions by a failing handler.
#[derive(Debug, Clone)]
pub struct Forwarded(pub Arc<ServiceError>);

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Placeholder; the dispatch middleware replaces it with the pipeline's answer.
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(Forwarded(Arc::new(self)));
        response
    }
}

//! # Error Pipeline
//!
//! Ordered stages that observe a forwarded error and eventually answer it:
//! Console log → File log → Client error → Catch-all
//!
//! Logging stages always run before any stage that can answer, so every
//! forwarded error is recorded however it ends up being answered.

use std::sync::Arc;

use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use uuid::Uuid;

use crate::observability::{ErrorLog, ErrorLogRecord};

use super::envelope::{Envelope, ErrorCode};
use super::errors::ServiceError;

/// Message sent for any error the client is not at fault for.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// A forwarded error plus the request it came from
#[derive(Debug, Clone)]
pub struct ForwardedError {
    pub error: Arc<ServiceError>,
    pub request_id: Uuid,
    pub method: Method,
    pub uri: Uri,
}

impl ForwardedError {
    /// One-line description shared by the logging stages
    pub fn describe(&self) -> String {
        format!(
            "{} {} failed [{}] ({}): {}",
            self.method,
            self.uri,
            self.request_id,
            self.error.kind(),
            self.error
        )
    }
}

/// What a stage decided
pub enum StageOutcome {
    /// Hand the error to the next stage
    Forward,
    /// Answer the request and stop the chain
    Respond(Response),
}

/// A single stage of the error pipeline
pub trait ErrorStage: Send + Sync {
    /// Stage name, for diagnostics
    fn name(&self) -> &'static str;

    fn handle(&self, err: &ForwardedError) -> StageOutcome;
}

/// Writes the error to the operator console.
pub struct ConsoleLogStage;

impl ErrorStage for ConsoleLogStage {
    fn name(&self) -> &'static str {
        "console_log"
    }

    fn handle(&self, err: &ForwardedError) -> StageOutcome {
        tracing::error!(target: "pie_api::errors", "Log Entry: {}", err.describe());
        StageOutcome::Forward
    }
}

/// Appends the error to the persistent error log.
pub struct FileLogStage {
    log: Arc<dyn ErrorLog>,
}

impl FileLogStage {
    pub fn new(log: Arc<dyn ErrorLog>) -> Self {
        Self { log }
    }
}

impl ErrorStage for FileLogStage {
    fn name(&self) -> &'static str {
        "file_log"
    }

    fn handle(&self, err: &ForwardedError) -> StageOutcome {
        let record = ErrorLogRecord {
            timestamp: Utc::now(),
            request_id: err.request_id,
            method: err.method.to_string(),
            uri: err.uri.to_string(),
            kind: err.error.kind().to_string(),
            message: err.error.to_string(),
        };

        if let Err(e) = self.log.append(&record) {
            tracing::warn!(request_id = %err.request_id, error = %e, "failed to write error log");
        }
        StageOutcome::Forward
    }
}

/// Answers client-fault errors with their 4xx status.
pub struct ClientErrorStage;

impl ErrorStage for ClientErrorStage {
    fn name(&self) -> &'static str {
        "client_error"
    }

    fn handle(&self, err: &ForwardedError) -> StageOutcome {
        match err.error.client_status() {
            Some(status) => StageOutcome::Respond(
                Envelope::failure(status, ErrorCode::for_client_status(status), err.error.to_string())
                    .into_response(),
            ),
            None => StageOutcome::Forward,
        }
    }
}

/// Terminal stage: 500 with a generic message.
pub struct CatchAllStage;

impl CatchAllStage {
    fn response() -> Response {
        Envelope::failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            GENERIC_ERROR_MESSAGE,
        )
        .into_response()
    }
}

impl ErrorStage for CatchAllStage {
    fn name(&self) -> &'static str {
        "catch_all"
    }

    fn handle(&self, _err: &ForwardedError) -> StageOutcome {
        StageOutcome::Respond(Self::response())
    }
}

/// The ordered error pipeline
pub struct ErrorPipeline {
    stages: Vec<Arc<dyn ErrorStage>>,
}

impl ErrorPipeline {
    /// Empty pipeline; `dispatch` falls back to the catch-all answer.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Console log, file log, client error, catch-all, in that order
    pub fn standard(error_log: Arc<dyn ErrorLog>) -> Self {
        Self::new()
            .with_stage(ConsoleLogStage)
            .with_stage(FileLogStage::new(error_log))
            .with_stage(ClientErrorStage)
            .with_stage(CatchAllStage)
    }

    /// Append a stage to the end of the chain
    pub fn with_stage(mut self, stage: impl ErrorStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the stages in order and return the first answer.
    pub fn dispatch(&self, err: &ForwardedError) -> Response {
        for stage in &self.stages {
            if let StageOutcome::Respond(response) = stage.handle(err) {
                return response;
            }
        }
        CatchAllStage::response()
    }
}

impl Default for ErrorPipeline {
    fn default() -> Self {
        Self::new()
    }
}

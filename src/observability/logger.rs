//! Request logging
//!
//! One entry per handled request, tagged with the inbound request and the
//! outbound status.

use std::fmt;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Severity for a response status.
    ///
    /// Not-found and server failures log at ERROR, other client faults at WARN.
    pub fn for_status(status: u16) -> Self {
        match status {
            404 | 500..=u16::MAX => Severity::Error,
            400..=499 => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request/response pair a log entry is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLogContext {
    pub request_id: Uuid,
    pub method: String,
    pub uri: String,
    pub status: u16,
}

/// Logger collaborator used by the HTTP layer
pub trait RequestLogger: Send + Sync {
    fn log(&self, severity: Severity, message: &str, ctx: &RequestLogContext);
}

/// Logger that emits `tracing` events under the `pie_api::requests` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRequestLogger;

impl RequestLogger for TracingRequestLogger {
    fn log(&self, severity: Severity, message: &str, ctx: &RequestLogContext) {
        match severity {
            Severity::Info => tracing::info!(
                target: "pie_api::requests",
                request_id = %ctx.request_id,
                method = %ctx.method,
                uri = %ctx.uri,
                status = ctx.status,
                "{message}"
            ),
            Severity::Warn => tracing::warn!(
                target: "pie_api::requests",
                request_id = %ctx.request_id,
                method = %ctx.method,
                uri = %ctx.uri,
                status = ctx.status,
                "{message}"
            ),
            Severity::Error => tracing::error!(
                target: "pie_api::requests",
                request_id = %ctx.request_id,
                method = %ctx.method,
                uri = %ctx.uri,
                status = ctx.status,
                "{message}"
            ),
        }
    }
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedRequest {
    pub severity: Severity,
    pub message: String,
    pub context: RequestLogContext,
}

/// In-memory logger for testing.
#[derive(Debug, Default)]
pub struct MemoryRequestLogger {
    entries: Mutex<Vec<LoggedRequest>>,
}

impl MemoryRequestLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured entries.
    pub fn entries(&self) -> Vec<LoggedRequest> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestLogger for MemoryRequestLogger {
    fn log(&self, severity: Severity, message: &str, ctx: &RequestLogContext) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(LoggedRequest {
                severity,
                message: message.to_string(),
                context: ctx.clone(),
            });
    }
}

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling this twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

//! Observability for the pie service
//!
//! - Request log entries through the [`RequestLogger`] collaborator
//! - Append-only error log (one JSON record per line)
//! - `tracing` subscriber setup for the binary

mod error_log;
mod logger;

pub use error_log::{ErrorLog, ErrorLogRecord, FileErrorLog, MemoryErrorLog};
pub use logger::{
    init_tracing, LoggedRequest, MemoryRequestLogger, RequestLogContext, RequestLogger, Severity,
    TracingRequestLogger,
};

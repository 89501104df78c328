//! # Pie HTTP Server
//!
//! Axum service exposing the pie collection.
//!
//! # Endpoints
//!
//! - `GET /api/` - All pies
//! - `GET /api/search?id=&name=` - Filtered pies
//! - `GET|PUT|PATCH|DELETE /api/:id` - Single pie
//! - `POST /api/` - Create a pie

pub mod config;
pub mod envelope;
pub mod errors;
pub mod middleware;
pub mod pie_routes;
pub mod pipeline;
pub mod server;

pub use config::{ConfigError, ServiceConfig};
pub use envelope::{Envelope, ErrorBody, ErrorCode};
pub use errors::{ServiceError, ServiceResult};
pub use pipeline::{
    CatchAllStage, ClientErrorStage, ConsoleLogStage, ErrorPipeline, ErrorStage, FileLogStage,
    ForwardedError, StageOutcome, GENERIC_ERROR_MESSAGE,
};
pub use server::{PieService, ServiceSetupError, ServiceState};

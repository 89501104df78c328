//! Response Middleware
//!
//! Wraps every route: tags the request with an id, hands forwarded errors to
//! the error pipeline, and writes one request log entry for everything else.

use std::sync::Arc;

use axum::extract::{OriginalUri, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::observability::{RequestLogContext, Severity};

use super::errors::Forwarded;
use super::pipeline::ForwardedError;
use super::server::ServiceState;

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn handle_response(
    State(state): State<Arc<ServiceState>>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());

    let mut response = next.run(request).await;
    let forwarded = response.extensions_mut().remove::<Forwarded>();

    let mut response = match forwarded {
        Some(Forwarded(error)) => {
            let forwarded = ForwardedError {
                error,
                request_id,
                method,
                uri,
            };
            state.errors.dispatch(&forwarded)
        }
        None => {
            let status = response.status().as_u16();
            let ctx = RequestLogContext {
                request_id,
                method: method.to_string(),
                uri: uri.to_string(),
                status,
            };
            let message = format!("{} {} -> {}", ctx.method, ctx.uri, status);
            state.logger.log(Severity::for_status(status), &message, &ctx);
            response
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

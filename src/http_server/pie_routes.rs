//! Pie HTTP Routes
//!
//! | Method | Path      | Answer                               |
//! |--------|-----------|--------------------------------------|
//! | GET    | `/`       | 200, all pies                        |
//! | GET    | `/search` | 200, pies matching `?id=&name=`      |
//! | GET    | `/:id`    | 200 with the pie, or 404             |
//! | POST   | `/`       | 201 with the created pie             |
//! | PUT    | `/:id`    | 200 with the updated pie, or 404     |
//! | PATCH  | `/:id`    | 200 with the patched pie, or 404     |
//! | DELETE | `/:id`    | 200 with a confirmation, or 404      |
//!
//! Not-found and method-not-allowed are answered here. Every other failure,
//! including unreadable paths, query strings and bodies, is returned as a
//! [`ServiceError`](super::errors::ServiceError) and answered by the error
//! pipeline.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::pie::{Pie, PieFields, PieFilter, PieId};
use crate::repository::RepositoryError;

use super::envelope::{Envelope, ErrorCode};
use super::errors::ServiceResult;
use super::server::ServiceState;

type RequestBody = Result<Json<PieFields>, JsonRejection>;
type RawId = Result<Path<String>, PathRejection>;
type SearchQuery = Result<Query<PieFilter>, QueryRejection>;

/// Create pie routes under `prefix` (e.g. "/api")
pub fn pie_routes(prefix: &str) -> Router<Arc<ServiceState>> {
    let root = get(list_pies_handler)
        .post(create_pie_handler)
        .fallback(method_not_allowed_handler);

    let mut router = Router::new()
        .route(&format!("{prefix}/"), root.clone())
        .route(
            &format!("{prefix}/search"),
            get(search_pies_handler).fallback(method_not_allowed_handler),
        )
        .route(
            &format!("{prefix}/:id"),
            get(get_pie_handler)
                .put(update_pie_handler)
                .patch(patch_pie_handler)
                .delete(delete_pie_handler)
                .fallback(method_not_allowed_handler),
        );

    if !prefix.is_empty() {
        router = router.route(prefix, root);
    }
    router
}

/// 404 envelope for paths no route matches
pub async fn route_not_found_handler(uri: Uri) -> Envelope {
    Envelope::failure(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        format!("Route '{}' could not be found.", uri.path()),
    )
}

/// 405 envelope for a known path asked with a method it does not serve
async fn method_not_allowed_handler(method: Method, uri: Uri) -> Envelope {
    Envelope::failure(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed,
        format!("Method '{}' is not allowed on '{}'.", method, uri.path()),
    )
}

// ==================
// Helper Functions
// ==================

fn pie_not_found(raw_id: &str) -> Response {
    Envelope::failure(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        format!("The pie '{}' could not be found.", raw_id),
    )
    .into_response()
}

/// Look up the pie named by a raw path segment. Unparsable ids match nothing.
async fn find_pie(state: &ServiceState, raw_id: &str) -> ServiceResult<Option<Pie>> {
    match raw_id.parse::<PieId>() {
        Ok(id) => Ok(state.repository.get_by_id(id).await?),
        Err(_) => Ok(None),
    }
}

/// Shared body of PUT and PATCH
async fn apply_update(
    state: &ServiceState,
    raw_id: &str,
    fields: PieFields,
    verb: &str,
) -> ServiceResult<Response> {
    let Some(existing) = find_pie(state, raw_id).await? else {
        return Ok(pie_not_found(raw_id));
    };

    match state.repository.update(existing.id, fields).await {
        Ok(pie) => Ok(Envelope::success(
            StatusCode::OK,
            format!("Pie '{}' {}.", raw_id, verb),
            pie,
        )
        .into_response()),
        // Removed between lookup and update
        Err(RepositoryError::NotFound(_)) => Ok(pie_not_found(raw_id)),
        Err(e) => Err(e.into()),
    }
}

// ==================
// Handlers
// ==================

async fn list_pies_handler(
    State(state): State<Arc<ServiceState>>,
) -> ServiceResult<Envelope<Vec<Pie>>> {
    let pies = state.repository.get_all().await?;
    Ok(Envelope::success(StatusCode::OK, "All pies retrieved.", pies))
}

async fn search_pies_handler(
    State(state): State<Arc<ServiceState>>,
    query: SearchQuery,
) -> ServiceResult<Envelope<Vec<Pie>>> {
    let Query(filter) = query?;
    let pies = state.repository.search(&filter).await?;
    Ok(Envelope::success(StatusCode::OK, "All pies retrieved.", pies))
}

async fn get_pie_handler(
    State(state): State<Arc<ServiceState>>,
    path: RawId,
) -> ServiceResult<Response> {
    let Path(raw_id) = path?;
    Ok(match find_pie(&state, &raw_id).await? {
        Some(pie) => Envelope::success(StatusCode::OK, "Single pie retrieved.", pie).into_response(),
        None => pie_not_found(&raw_id),
    })
}

async fn create_pie_handler(
    State(state): State<Arc<ServiceState>>,
    body: RequestBody,
) -> ServiceResult<Envelope<Pie>> {
    let Json(fields) = body?;
    let pie = state.repository.insert(fields).await?;
    Ok(Envelope::success(StatusCode::CREATED, "New pie added.", pie))
}

async fn update_pie_handler(
    State(state): State<Arc<ServiceState>>,
    path: RawId,
    body: RequestBody,
) -> ServiceResult<Response> {
    let Path(raw_id) = path?;
    let Json(fields) = body?;
    apply_update(&state, &raw_id, fields, "updated").await
}

async fn patch_pie_handler(
    State(state): State<Arc<ServiceState>>,
    path: RawId,
    body: RequestBody,
) -> ServiceResult<Response> {
    let Path(raw_id) = path?;
    let Json(fields) = body?;
    apply_update(&state, &raw_id, fields, "patched").await
}

async fn delete_pie_handler(
    State(state): State<Arc<ServiceState>>,
    path: RawId,
) -> ServiceResult<Response> {
    let Path(raw_id) = path?;
    let Some(existing) = find_pie(&state, &raw_id).await? else {
        return Ok(pie_not_found(&raw_id));
    };

    match state.repository.delete(existing.id).await {
        Ok(()) => Ok(Envelope::success(
            StatusCode::OK,
            format!("The pie '{}' is deleted.", raw_id),
            format!("Pie '{}' deleted.", raw_id),
        )
        .into_response()),
        Err(RepositoryError::NotFound(_)) => Ok(pie_not_found(&raw_id)),
        Err(e) => Err(e.into()),
    }
}

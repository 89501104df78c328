//! Shared harness for driving the pie router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pie_api::http_server::{PieService, ServiceConfig};
use pie_api::observability::{MemoryErrorLog, MemoryRequestLogger};
use pie_api::pie::{Pie, PieFields, PieId};
use pie_api::repository::{MemoryPieRepository, PieRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Sends requests through a router in-process.
pub struct TestClient {
    router: Router,
}

/// A client for a service wired to in-memory loggers.
pub struct Harness {
    pub client: TestClient,
    pub logger: Arc<MemoryRequestLogger>,
    pub error_log: Arc<MemoryErrorLog>,
}

pub fn pie(id: u64, name: &str) -> Pie {
    let fields: PieFields = serde_json::from_value(json!({ "name": name })).unwrap();
    Pie::new(PieId::new(id), fields)
}

/// Repository seeded with Apple (1), Cherry (2), Dutch Apple (3)
pub fn seeded_repository() -> Arc<MemoryPieRepository> {
    Arc::new(MemoryPieRepository::with_pies(vec![
        pie(1, "Apple"),
        pie(2, "Cherry"),
        pie(3, "Dutch Apple"),
    ]))
}

pub fn harness_with(repository: Arc<dyn PieRepository>) -> Harness {
    let logger = Arc::new(MemoryRequestLogger::new());
    let error_log = Arc::new(MemoryErrorLog::new());
    let service = PieService::new(
        ServiceConfig::default(),
        repository,
        logger.clone(),
        error_log.clone(),
    );

    Harness {
        client: TestClient::new(service.router()),
        logger,
        error_log,
    }
}

pub fn harness() -> Harness {
    harness_with(seeded_repository())
}

impl Harness {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.client.request(method, uri, body).await
    }

    pub async fn raw(&self, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        self.client.raw(method, uri, content_type, body).await
    }
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn raw(&self, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();

        let parsed = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, parsed)
    }
}

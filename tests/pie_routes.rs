//! Route contract tests
//!
//! Every response is an envelope whose `status` equals the HTTP status;
//! not-found is answered by the handlers as a 404 envelope.

mod common;

use axum::http::{Method, StatusCode};
use pie_api::observability::Severity;
use serde_json::{json, Value};

use common::harness;

fn ids(data: &Value) -> Vec<u64> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_list_all_pies() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["statusText"], "OK");
    assert_eq!(body["message"], "All pies retrieved.");
    assert_eq!(ids(&body["data"]), vec![1, 2, 3]);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_list_without_trailing_slash() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_get_existing_pie() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Single pie retrieved.");
    assert_eq!(body["data"], json!({ "id": 1, "name": "Apple" }));
}

#[tokio::test]
async fn test_get_every_seeded_id() {
    let h = harness();
    for id in 1..=3u64 {
        let (status, body) = h.request(Method::GET, &format!("/api/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id);
    }
}

#[tokio::test]
async fn test_get_missing_pie() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["statusText"], "Not Found");
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "The pie '42' could not be found.");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_get_non_numeric_id_is_not_found() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api/apple", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "The pie 'apple' could not be found.");
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_without_params_matches_list() {
    let h = harness();
    let (_, all) = h.request(Method::GET, "/api/", None).await;
    let (status, searched) = h.request(Method::GET, "/api/search", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(searched["data"], all["data"]);
}

#[tokio::test]
async fn test_search_by_name_is_case_insensitive_substring() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api/search?name=apple", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]), vec![1, 3]);

    let (_, upper) = h.request(Method::GET, "/api/search?name=APPLE", None).await;
    assert_eq!(upper["data"], body["data"]);
}

#[tokio::test]
async fn test_search_by_id_and_name() {
    let h = harness();
    let (_, body) = h.request(Method::GET, "/api/search?id=3&name=Apple", None).await;
    assert_eq!(ids(&body["data"]), vec![3]);

    let (_, none) = h.request(Method::GET, "/api/search?id=2&name=Apple", None).await;
    assert_eq!(none["data"], json!([]));
}

#[tokio::test]
async fn test_search_without_matches_is_empty_success() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/api/search?name=Rhubarb", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_pie() {
    let h = harness();
    let (status, body) = h
        .request(
            Method::POST,
            "/api/",
            Some(json!({ "name": "Peach", "crust": "lattice", "id": 1 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["statusText"], "Created");
    assert_eq!(body["message"], "New pie added.");
    assert!(body.get("messages").is_none());

    let data = &body["data"];
    assert_eq!(data["name"], "Peach");
    assert_eq!(data["crust"], "lattice");
    let id = data["id"].as_u64().unwrap();
    assert!(![1, 2, 3].contains(&id));

    let (status, fetched) = h.request(Method::GET, &format!("/api/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], *data);
}

#[tokio::test]
async fn test_put_then_get_reflects_update() {
    let h = harness();
    let (status, body) = h
        .request(Method::PUT, "/api/2", Some(json!({ "name": "Sour Cherry", "price": 14 })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pie '2' updated.");
    assert_eq!(body["data"], json!({ "id": 2, "name": "Sour Cherry", "price": 14 }));

    let (_, fetched) = h.request(Method::GET, "/api/2", None).await;
    assert_eq!(fetched["data"], body["data"]);
}

#[tokio::test]
async fn test_put_missing_pie() {
    let h = harness();
    let (status, body) = h
        .request(Method::PUT, "/api/9", Some(json!({ "name": "Ghost" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, all) = h.request(Method::GET, "/api/", None).await;
    assert_eq!(ids(&all["data"]), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_patch_merges_fields() {
    let h = harness();
    let (status, body) = h
        .request(Method::PATCH, "/api/1", Some(json!({ "price": 10 })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pie '1' patched.");
    assert_eq!(body["data"], json!({ "id": 1, "name": "Apple", "price": 10 }));
}

#[tokio::test]
async fn test_patch_missing_pie_answers_404() {
    let h = harness();
    let (status, body) = h
        .request(Method::PATCH, "/api/77", Some(json!({ "price": 10 })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"]["message"], "The pie '77' could not be found.");
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let h = harness();
    let (status, body) = h.request(Method::DELETE, "/api/3", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "The pie '3' is deleted.");
    assert_eq!(body["data"], "Pie '3' deleted.");

    let (status, body) = h.request(Method::DELETE, "/api/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = h.request(Method::GET, "/api/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Envelope and logging
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_enveloped() {
    let h = harness();
    let (status, body) = h.request(Method::GET, "/pies", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Route '/pies' could not be found.");
}

#[tokio::test]
async fn test_unsupported_method_is_enveloped() {
    let h = harness();
    let cases = [
        (Method::POST, "/api/1"),
        (Method::PUT, "/api/"),
        (Method::DELETE, "/api/search"),
    ];

    for (method, uri) in cases {
        let (status, body) = h.request(method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(body["status"], 405, "{method} {uri}");
        assert_eq!(body["statusText"], "Method Not Allowed");
        assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
        assert_eq!(
            body["error"]["message"],
            format!("Method '{}' is not allowed on '{}'.", method, uri)
        );
    }

    let entries = h.logger.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.severity == Severity::Warn));
    assert!(h.error_log.is_empty());

    // Nothing was written
    let (_, all) = h.request(Method::GET, "/api/", None).await;
    assert_eq!(all["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_envelope_status_matches_http_status() {
    let h = harness();
    let cases = [
        (Method::GET, "/api/", None),
        (Method::GET, "/api/1", None),
        (Method::GET, "/api/100", None),
        (Method::POST, "/api/", Some(json!({ "name": "Pecan" }))),
        (Method::DELETE, "/api/100", None),
    ];

    for (method, uri, body) in cases {
        let (status, envelope) = h.request(method, uri, body).await;
        assert_eq!(envelope["status"], status.as_u16(), "{uri}");
        assert_eq!(envelope["statusText"], status.canonical_reason().unwrap(), "{uri}");
    }
}

#[tokio::test]
async fn test_every_handled_request_is_logged() {
    let h = harness();
    h.request(Method::GET, "/api/1", None).await;
    h.request(Method::GET, "/api/404", None).await;
    h.request(Method::POST, "/api/", Some(json!({ "name": "Lemon" }))).await;
    h.request(Method::DELETE, "/api/2", None).await;

    let entries = h.logger.entries();
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[0].severity, Severity::Info);
    assert_eq!(entries[0].context.uri, "/api/1");
    assert_eq!(entries[1].severity, Severity::Error);
    assert_eq!(entries[1].context.status, 404);
    assert_eq!(entries[2].context.method, "POST");
    assert_eq!(entries[2].context.status, 201);
    assert_eq!(entries[3].severity, Severity::Info);

    assert!(h.error_log.is_empty());
}

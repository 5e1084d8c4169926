//! HTTP Surface Tests
//!
//! Drive the mounted axum router end to end and assert the wire contract:
//! status codes, content type, Backbone-shaped bodies, and the stable error
//! envelope.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use restbone::{server, MemoryCollection, Resource, ResourceSpec};
use serde_json::{json, Map, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn row(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn things_router() -> Router {
    let collection = MemoryCollection::new("id");
    collection.insert(row(json!({"id": "1", "name": "Ann", "age": 30})));
    collection.insert(row(json!({"id": "2", "name": "Bo", "age": 25})));

    let spec = ResourceSpec::new(collection).serialize_fields(["name", "age"]);
    server::router("/things", Arc::new(Resource::new(spec)))
}

fn paged_router(total: usize, page_size: usize) -> Router {
    let collection = MemoryCollection::new("id");
    for i in 0..total {
        collection.insert(row(json!({"id": i.to_string(), "n": i})));
    }
    let spec = ResourceSpec::new(collection)
        .serialize_fields(["n"])
        .page_size(page_size);
    server::router("/things", Arc::new(Resource::new(spec)))
}

async fn send(router: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

// =============================================================================
// Reads
// =============================================================================

/// GET collection returns a bare JSON array of projections.
#[tokio::test]
async fn test_get_collection() {
    let (status, body) = send(things_router(), "GET", "/things", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"name": "Ann", "age": 30}, {"name": "Bo", "age": 25}])
    );
}

/// GET single returns a bare JSON object.
#[tokio::test]
async fn test_get_single() {
    let (status, body) = send(things_router(), "GET", "/things/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "Ann", "age": 30}));
}

#[tokio::test]
async fn test_get_single_missing_is_404() {
    let (status, body) = send(things_router(), "GET", "/things/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found");
    assert_eq!(body["code"], 404);
}

// =============================================================================
// Pagination
// =============================================================================

/// 25 records, page size 10, p=3: five records starting at offset 20.
#[tokio::test]
async fn test_pagination_last_partial_page() {
    let (status, body) = send(paged_router(25, 10), "GET", "/things?p=3", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["n"], json!(20));
}

/// Garbage page parameter behaves as page 1.
#[tokio::test]
async fn test_pagination_garbage_param_is_first_page() {
    let (status, body) = send(paged_router(25, 10), "GET", "/things?p=garbage", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["n"], json!(0));
}

/// Page past the end is an empty array, not an error.
#[tokio::test]
async fn test_pagination_past_end_is_empty() {
    let (status, body) = send(paged_router(5, 10), "GET", "/things?p=4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Unsupported Operations
// =============================================================================

/// POST with no add-validator configured: 405 with the adapter's body.
#[tokio::test]
async fn test_post_without_validator_is_405() {
    let (status, body) = send(
        things_router(),
        "POST",
        "/things",
        Some(r#"{"name":"Bo"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "POST not supported");
}

/// PUT at the collection path (no id): collection-level rejection.
#[tokio::test]
async fn test_put_collection_is_405() {
    let (status, body) = send(things_router(), "PUT", "/things", Some("{}")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "PUT not supported");
}

#[tokio::test]
async fn test_delete_collection_is_405() {
    let (status, body) = send(things_router(), "DELETE", "/things", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "DELETE is not supported for collections");
}

// =============================================================================
// Deletes
// =============================================================================

/// DELETE returns the record's last state, then the id is gone.
#[tokio::test]
async fn test_delete_then_repeat_is_404() {
    let router = things_router();

    let (status, body) = send(router.clone(), "DELETE", "/things/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "Ann", "age": 30}));

    let (status, _) = send(router.clone(), "GET", "/things/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(router, "DELETE", "/things/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_id_is_404() {
    let (status, _) = send(things_router(), "DELETE", "/things/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Malformed Bodies & Validation Errors
// =============================================================================

fn writable_router() -> Router {
    use restbone::collection::MemoryRecord;
    use restbone::{ErrorSet, Validation, Validator};

    let collection = Arc::new(MemoryCollection::new("id"));
    let store = Arc::clone(&collection);
    let spec = ResourceSpec::new(collection)
        .serialize_fields(["id", "name"])
        .add_validator(move |input: Map<String, Value>, _: Option<&MemoryRecord>| {
            let store = Arc::clone(&store);
            let outcome = match input.get("name").and_then(Value::as_str) {
                Some(name) if !name.is_empty() => Validation::Saved(store.insert(input)),
                _ => {
                    let mut errors = ErrorSet::new();
                    errors.insert("name".into(), vec!["This field is required.".into()]);
                    Validation::Invalid(errors)
                }
            };
            Box::new(restbone::validator::Resolved(outcome)) as Box<dyn Validator<MemoryRecord>>
        });
    server::router("/things", Arc::new(Resource::new(spec)))
}

#[tokio::test]
async fn test_post_malformed_json_is_400() {
    let (status, body) = send(writable_router(), "POST", "/things", Some("{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid POST JSON");
}

#[tokio::test]
async fn test_post_validation_failure_envelope() {
    let (status, body) = send(writable_router(), "POST", "/things", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ERROR: validation failed");
    assert_eq!(body["fields"]["name"][0], "This field is required.");
}

#[tokio::test]
async fn test_post_create_round_trip() {
    let router = writable_router();

    let (status, created) = send(
        router.clone(),
        "POST",
        "/things",
        Some(r#"{"id":"7","name":"Cy"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, json!({"id": "7", "name": "Cy"}));

    let (status, fetched) = send(router, "GET", "/things/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

use super::*;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sortlab_storage::MemoryExerciseStore;
use tower::ServiceExt;

fn test_router() -> Router {
    install_http_metrics();
    let state = Arc::new(GatewayState::with_store(Arc::new(MemoryExerciseStore::new())));
    router(state, &ServiceConfig::default()).unwrap()
}

fn detached_router() -> Router {
    install_http_metrics();
    router(Arc::new(GatewayState::new()), &ServiceConfig::default()).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn sample_body() -> Value {
    json!({
        "name": "warmup",
        "description": "sort three spheres",
        "array": [3, 1, 2],
        "instructions": "drag the smallest to the front"
    })
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = test_router();
    let (status, created) = send(&app, Method::POST, "/api/exercises", Some(sample_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(created["array"], json!([3, 1, 2]));

    let (status, fetched) = send(&app, Method::GET, &format!("/api/exercises/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_returns_created_records() {
    let app = test_router();
    let (_, a) = send(&app, Method::POST, "/api/exercises", Some(sample_body())).await;
    let (_, b) = send(
        &app,
        Method::POST,
        "/api/exercises",
        Some(json!({ "array": [5, 4] })),
    )
    .await;

    let (status, listed) = send(&app, Method::GET, "/api/exercises", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a["id"].as_str().unwrap()));
    assert!(ids.contains(&b["id"].as_str().unwrap()));
}

#[tokio::test]
async fn malformed_id_is_a_400_with_error_body() {
    let app = test_router();
    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(json!({ "array": [1] }))),
        (Method::DELETE, None),
    ] {
        let (status, response) = send(&app, method, "/api/exercises/not-an-id", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"]
            .as_str()
            .unwrap()
            .contains("Invalid exercise id"));
    }
}

#[tokio::test]
async fn unknown_id_is_a_404() {
    let app = test_router();
    let ghost = "0102030405060708090a0b0c";
    let (status, response) =
        send(&app, Method::GET, &format!("/api/exercises/{ghost}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Exercise not found");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/exercises/{ghost}"),
        Some(json!({ "array": [1, 2] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_merges_and_preserves_other_fields() {
    let app = test_router();
    let (_, created) = send(&app, Method::POST, "/api/exercises", Some(sample_body())).await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/exercises/{id}"),
        Some(json!({ "array": [1, 2, 3, 4] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["array"], json!([1, 2, 3, 4]));
    assert_eq!(updated["name"], "warmup");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/exercises/{id}"), None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let app = test_router();
    let (_, created) = send(&app, Method::POST, "/api/exercises", Some(sample_body())).await;
    let id = created["id"].as_str().unwrap();

    let (status, response) =
        send(&app, Method::DELETE, &format!("/api/exercises/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let (status, _) = send(&app, Method::GET, &format!("/api/exercises/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/exercises/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_without_array_is_rejected() {
    let app = test_router();
    let (status, response) = send(
        &app,
        Method::POST,
        "/api/exercises",
        Some(json!({ "name": "no array" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("array"));
}

#[tokio::test]
async fn update_with_unknown_field_is_a_400_with_error_body() {
    let app = test_router();
    let (_, created) = send(&app, Method::POST, "/api/exercises", Some(sample_body())).await;
    let id = created["id"].as_str().unwrap();

    let (status, response) = send(
        &app,
        Method::PUT,
        &format!("/api/exercises/{id}"),
        Some(json!({ "color": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("color"));

    // The record is untouched.
    let (_, fetched) = send(&app, Method::GET, &format!("/api/exercises/{id}"), None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn requests_before_store_attach_fail_fast_with_503() {
    let app = detached_router();
    for (method, uri, body) in [
        (Method::GET, "/api/exercises", None),
        (Method::POST, "/api/exercises", Some(sample_body())),
        (Method::GET, "/api/exercises/0102030405060708090a0b0c", None),
    ] {
        let (status, response) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response["error"],
            "Database not connected yet. Please try again."
        );
    }
}

#[tokio::test]
async fn store_becomes_available_after_attach() {
    install_http_metrics();
    let state = Arc::new(GatewayState::new());
    let app = router(state.clone(), &ServiceConfig::default()).unwrap();

    let (status, _) = send(&app, Method::GET, "/api/exercises", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    assert!(state.attach_store(Arc::new(MemoryExerciseStore::new())));
    let (status, listed) = send(&app, Method::GET, "/api/exercises", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    // Second attach is rejected; the handle is set once.
    assert!(!state.attach_store(Arc::new(MemoryExerciseStore::new())));
}

#[tokio::test]
async fn metrics_endpoint_serves_text_exposition() {
    let app = test_router();
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
}

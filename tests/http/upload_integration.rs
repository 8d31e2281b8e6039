//! Integration tests for the upload-and-process endpoint
//!
//! Drives the full router with stub /bin/sh processors: staging,
//! subprocess invocation, result relay, error envelopes, and
//! workspace isolation.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt as TowerServiceExt;

use crate::common::helpers::{
    create_test_app, create_test_app_with, file_part, multipart_request, text_part,
};

/// Stub that relays a fixed payload, like a well-behaved processor
const ALICE_STUB: &str = "printf '{\"name\":\"Alice\"}' > person.json\n";

/// Stub that reports how many staged files carry the upload prefix
const COUNTING_STUB: &str =
    "prefixed=$(ls docs | grep -c '^myFiles-')\nprintf '{\"prefixed\":%s}' \"$prefixed\" > person.json\n";

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp) = create_test_app(ALICE_STUB);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let health = response_json(response).await;
    assert_eq!(health["status"], "ok");
    assert!(!health["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_no_files_rejected_with_message() {
    let (app, _temp) = create_test_app(ALICE_STUB);

    // A multipart body with no file under the upload field
    let request = multipart_request(&[text_part("note", "hello")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Please choose files");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_files_under_other_field_names_ignored() {
    let (app, _temp) = create_test_app(ALICE_STUB);

    let request = multipart_request(&[file_part("otherFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Please choose files");
}

#[tokio::test]
async fn test_upload_relays_processor_result() {
    let (app, _temp) = create_test_app(ALICE_STUB);

    let request = multipart_request(&[file_part("myFiles", "a.txt", "some document text")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"name": "Alice"}));
}

#[tokio::test]
async fn test_all_files_staged_with_field_prefix() {
    let (app, _temp) = create_test_app(COUNTING_STUB);

    let parts = vec![
        file_part("myFiles", "a.txt", "first"),
        file_part("myFiles", "b.txt", "second"),
        file_part("myFiles", "c.txt", "third"),
    ];
    let response = app.oneshot(multipart_request(&parts)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"prefixed": 3}));
}

#[tokio::test]
async fn test_max_files_accepted() {
    let (app, _temp) = create_test_app(COUNTING_STUB);

    let parts: Vec<String> = (0..12)
        .map(|i| file_part("myFiles", &format!("f{i}.txt"), "x"))
        .collect();
    let response = app.oneshot(multipart_request(&parts)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"prefixed": 12}));
}

#[tokio::test]
async fn test_over_max_files_rejected() {
    let (app, _temp) = create_test_app(COUNTING_STUB);

    let parts: Vec<String> = (0..13)
        .map(|i| file_part("myFiles", &format!("f{i}.txt"), "x"))
        .collect();
    let response = app.oneshot(multipart_request(&parts)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Too many files"));
}

#[tokio::test]
async fn test_failing_processor_is_structured_error() {
    let (app, _temp) = create_test_app("exit 1\n");

    let request = multipart_request(&[file_part("myFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("exit code 1"));
    assert_eq!(body["status"], 500);
}

#[tokio::test]
async fn test_missing_result_artifact_is_structured_error() {
    // Processor succeeds but never writes its result file
    let (app, _temp) = create_test_app("exit 0\n");

    let request = multipart_request(&[file_part("myFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Result artifact not found"));
}

#[tokio::test]
async fn test_corrupt_result_artifact_is_structured_error() {
    let (app, _temp) = create_test_app("printf 'not json' > person.json\n");

    let request = multipart_request(&[file_part("myFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("parse"));
}

#[tokio::test]
async fn test_concurrent_uploads_are_isolated() {
    // Each request's processor copies its own staged upload into the
    // result artifact; a shared upload directory would let one
    // request's file set leak into the other's result.
    let stub = "sleep 0.2\ncat docs/* > person.json\n";
    let (app, _temp) = create_test_app(stub);

    let request_a = multipart_request(&[file_part("myFiles", "a.json", r#"{"who":"A"}"#)]);
    let request_b = multipart_request(&[file_part("myFiles", "b.json", r#"{"who":"B"}"#)]);

    let (response_a, response_b) = tokio::join!(
        app.clone().oneshot(request_a),
        app.clone().oneshot(request_b),
    );

    let response_a = response_a.unwrap();
    let response_b = response_b.unwrap();
    assert_eq!(response_a.status(), StatusCode::OK);
    assert_eq!(response_b.status(), StatusCode::OK);

    assert_eq!(response_json(response_a).await, json!({"who": "A"}));
    assert_eq!(response_json(response_b).await, json!({"who": "B"}));
}

#[tokio::test]
async fn test_workspace_removed_after_response() {
    let (app, temp) = create_test_app(ALICE_STUB);

    let request = multipart_request(&[file_part("myFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let staging_root = temp.path().join("staging");
    assert_eq!(std::fs::read_dir(&staging_root).unwrap().count(), 0);
}

#[tokio::test]
async fn test_workspace_kept_when_configured() {
    let (app, temp) = create_test_app_with(ALICE_STUB, |config| {
        config.staging.keep_workspaces = true;
    });

    let request = multipart_request(&[file_part("myFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let staging_root = temp.path().join("staging");
    assert_eq!(std::fs::read_dir(&staging_root).unwrap().count(), 1);
}

#[tokio::test]
async fn test_workspace_removed_after_failure() {
    let (app, temp) = create_test_app("exit 1\n");

    let request = multipart_request(&[file_part("myFiles", "a.txt", "content")]);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let staging_root = temp.path().join("staging");
    assert_eq!(std::fs::read_dir(&staging_root).unwrap().count(), 0);
}

//! End-to-end tests driving the HTTP router over a real pipeline.

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use docseg::api::create_router;
use docseg::labeling::FallbackLabeler;
use docseg::segmenter::{RemoteSegmenter, SegmenterService};
use docseg::store::DocumentStore;
use httpmock::{Method::POST, MockServer};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn local_router(dir: &TempDir) -> axum::Router {
    let service = SegmenterService::with_parts(
        DocumentStore::new(dir.path()),
        RemoteSegmenter::new(None, None),
        Box::new(FallbackLabeler),
    );
    create_router(Arc::new(service))
}

async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn plain_text_document_is_segmented_with_contiguous_ids() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("lecture.txt"),
        "Thermodynamics basics. First law\nenergy conservation\n\n\
         Second law. Entropy\nalways increases\n\n\
         Closing remarks\n",
    )
    .unwrap();

    let json = get_json(local_router(&dir), "/segments?filename=lecture.txt").await;

    let segments = json["segments"].as_array().expect("segments array");
    assert_eq!(segments.len(), 3);
    for (index, segment) in segments.iter().enumerate() {
        assert_eq!(segment["id"], index + 1);
        let content = segment["content"].as_str().unwrap();
        assert_eq!(content, content.trim());
        assert_eq!(segment["tags"], serde_json::json!([]));
    }
    assert_eq!(segments[0]["topic"], "Thermodynamics basics");
    assert_eq!(segments[1]["topic"], "Second law");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn unknown_document_reports_error_in_body_not_status() {
    let dir = TempDir::new().unwrap();
    let json = get_json(local_router(&dir), "/segments?filename=missing.txt").await;

    assert_eq!(json["segments"], serde_json::json!([]));
    assert_eq!(json["error"], "document 'missing.txt' not found");
}

#[tokio::test]
async fn remote_segmentation_flows_through_router_and_metrics() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("paper.txt"), "body text\n").unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/segment");
            then.status(200).json_body(serde_json::json!({
                "data": { "segments": [
                    { "topic": "Abstract", "content": "Summary of findings." },
                    { "content": "Methods. Detailed setup" }
                ] }
            }));
        })
        .await;

    let service = SegmenterService::with_parts(
        DocumentStore::new(dir.path()),
        RemoteSegmenter::new(Some(server.url("/v1/segment")), None),
        Box::new(FallbackLabeler),
    );
    let service = Arc::new(service);

    let json = get_json(
        create_router(service.clone()),
        "/segments?filename=paper.txt",
    )
    .await;
    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["topic"], "Abstract");
    assert_eq!(segments[1]["topic"], "Methods");

    let metrics = get_json(create_router(service), "/metrics").await;
    assert_eq!(metrics["documents_segmented"], 1);
    assert_eq!(metrics["segments_produced"], 2);
    assert_eq!(metrics["remote_results"], 1);
}

#[tokio::test]
async fn documents_listing_reflects_stored_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("b.pdf"), "beta").unwrap();

    let json = get_json(local_router(&dir), "/documents").await;
    let documents = json["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    for document in documents {
        assert!(document["size"].as_u64().unwrap() > 0);
        assert!(document["upload_time"].as_str().unwrap().contains('T'));
    }
}

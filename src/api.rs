//! HTTP surface for Docseg.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `GET /segments?filename=…` – Segment a stored document into labeled segments.
//!   Always answers 200 with a `{segments, error?}` body; failures ride in the
//!   `error` field rather than in the status code.
//! - `GET /documents` – List documents currently present in the docs directory.
//! - `GET /metrics` – Observe segmentation counters.
//!
//! The router is generic over [`SegmenterApi`] so tests can drive it with a stub
//! pipeline.

use crate::metrics::MetricsSnapshot;
use crate::segmenter::{SegmentationResult, SegmenterApi};
use crate::store::DocumentInfo;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Build the HTTP router exposing the segmentation API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SegmenterApi + 'static,
{
    Router::new()
        .route("/segments", get(get_segments::<S>))
        .route("/documents", get(list_documents::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Query parameters for `GET /segments`.
#[derive(Deserialize)]
struct SegmentsQuery {
    /// Name of the stored document to segment.
    #[serde(default)]
    filename: Option<String>,
}

/// Segment a stored document.
async fn get_segments<S>(
    State(service): State<Arc<S>>,
    Query(query): Query<SegmentsQuery>,
) -> Json<SegmentationResult>
where
    S: SegmenterApi,
{
    let filename = query.filename.unwrap_or_default();
    Json(service.get_segments(&filename).await)
}

/// Response body for `GET /documents`.
#[derive(Serialize)]
struct DocumentsResponse {
    documents: Vec<DocumentInfo>,
}

/// List stored documents.
async fn list_documents<S>(State(service): State<Arc<S>>) -> Json<DocumentsResponse>
where
    S: SegmenterApi,
{
    Json(DocumentsResponse {
        documents: service.list_documents().await,
    })
}

/// Return segmentation counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SegmenterApi,
{
    Json(service.metrics_snapshot())
}

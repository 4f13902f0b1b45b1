//! Orchestrator coordinating the remote client and the local segmenter.

use crate::config::get_config;
use crate::labeling::{TopicLabeler, topic_labeler};
use crate::metrics::{MetricsSnapshot, SegmentMetrics};
use crate::segmenter::local;
use crate::segmenter::remote::RemoteSegmenter;
use crate::segmenter::types::{DocumentKind, SegmentError, SegmentationResult, extension_of};
use crate::store::{DocumentInfo, DocumentStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Coordinates the full segmentation pipeline per request: document lookup,
/// the remote segmentation attempt, and the format-aware local fallback.
///
/// The service owns long-lived handles to the document store, the remote
/// client, and the topic labeler so the HTTP surface can share one instance
/// through an `Arc`. No segmentation state is kept between requests; every
/// call recomputes its result from the document on disk.
pub struct SegmenterService {
    store: DocumentStore,
    remote: RemoteSegmenter,
    labeler: Box<dyn TopicLabeler + Send + Sync>,
    metrics: Arc<SegmentMetrics>,
}

/// Abstraction over the segmentation pipeline used by external surfaces.
#[async_trait]
pub trait SegmenterApi: Send + Sync {
    /// Segment the named document, returning a well-formed result in all cases.
    async fn get_segments(&self, filename: &str) -> SegmentationResult;

    /// Enumerate stored documents.
    async fn list_documents(&self) -> Vec<DocumentInfo>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SegmenterService {
    /// Build a service from the loaded configuration.
    pub fn new() -> Self {
        let config = get_config();
        Self::with_parts(
            DocumentStore::new(&config.docs_dir),
            RemoteSegmenter::from_config(),
            topic_labeler(),
        )
    }

    /// Build a service from explicit components.
    pub fn with_parts(
        store: DocumentStore,
        remote: RemoteSegmenter,
        labeler: Box<dyn TopicLabeler + Send + Sync>,
    ) -> Self {
        Self {
            store,
            remote,
            labeler,
            metrics: Arc::new(SegmentMetrics::new()),
        }
    }

    /// Segment one document.
    ///
    /// Failures never escape as errors; they come back as an `error` string on
    /// the result with an empty segment list.
    pub async fn get_segments(&self, filename: &str) -> SegmentationResult {
        match self.segment_document(filename).await {
            Ok((result, remote)) => {
                self.metrics
                    .record_document(result.segments.len() as u64, remote);
                tracing::info!(
                    filename,
                    segments = result.segments.len(),
                    remote,
                    "Document segmented"
                );
                result
            }
            Err(error) => {
                tracing::warn!(filename, error = %error, "Segmentation request failed");
                SegmentationResult::failure(&error)
            }
        }
    }

    async fn segment_document(
        &self,
        filename: &str,
    ) -> Result<(SegmentationResult, bool), SegmentError> {
        let name = filename.trim();
        if name.is_empty() {
            return Err(SegmentError::MissingFilename);
        }
        if !self.store.exists(name) {
            return Err(SegmentError::NotFound(name.to_string()));
        }
        let kind = DocumentKind::from_name(name)
            .ok_or_else(|| SegmentError::UnsupportedFormat(extension_of(name)))?;

        match kind {
            DocumentKind::PlainText => {
                let text = self.store.read_text(name)?;
                if let Some(result) = self.remote.try_segment(&text).await {
                    tracing::debug!(filename, "Remote segmentation accepted");
                    return Ok((result, true));
                }
                let segments = local::segment_lines(&text, self.labeler.as_ref()).await;
                Ok((SegmentationResult::ok(segments), false))
            }
            DocumentKind::Pdf => {
                let pages = self.store.page_texts(name)?;
                let full_text = pages.join("\n\n");
                if let Some(result) = self.remote.try_segment(&full_text).await {
                    tracing::debug!(filename, "Remote segmentation accepted");
                    return Ok((result, true));
                }
                let segments = local::segment_pages(&pages, self.labeler.as_ref()).await;
                Ok((SegmentationResult::ok(segments), false))
            }
        }
    }
}

#[async_trait]
impl SegmenterApi for SegmenterService {
    async fn get_segments(&self, filename: &str) -> SegmentationResult {
        SegmenterService::get_segments(self, filename).await
    }

    async fn list_documents(&self) -> Vec<DocumentInfo> {
        self.store.list()
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

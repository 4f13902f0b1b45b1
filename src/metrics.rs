use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing segmentation activity.
#[derive(Default)]
pub struct SegmentMetrics {
    documents_segmented: AtomicU64,
    segments_produced: AtomicU64,
    remote_results: AtomicU64,
}

impl SegmentMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a segmented document, the number of segments it produced, and
    /// whether the remote service supplied the result.
    pub fn record_document(&self, segment_count: u64, remote: bool) {
        self.documents_segmented.fetch_add(1, Ordering::Relaxed);
        self.segments_produced
            .fetch_add(segment_count, Ordering::Relaxed);
        if remote {
            self.remote_results.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_segmented: self.documents_segmented.load(Ordering::Relaxed),
            segments_produced: self.segments_produced.load(Ordering::Relaxed),
            remote_results: self.remote_results.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of segmentation counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents segmented since startup.
    pub documents_segmented: u64,
    /// Total segment count produced across all documents.
    pub segments_produced: u64,
    /// Number of results served by the external segmentation service.
    pub remote_results: u64,
}

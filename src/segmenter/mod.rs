//! Segmentation pipeline: data model, local chunking, remote client, orchestration.

/// Deterministic, format-aware fallback segmentation.
pub mod local;
mod remote;
mod service;
mod types;

pub use remote::RemoteSegmenter;
pub use service::{SegmenterApi, SegmenterService};
pub use types::{DocumentKind, Segment, SegmentError, SegmentationResult};

#![deny(missing_docs)]

//! Core library for the Docseg segmentation server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Topic labeler abstraction and adapters.
pub mod labeling;
/// Structured logging and tracing setup.
pub mod logging;
/// Segmentation metrics helpers.
pub mod metrics;
/// Segmentation pipeline: local chunking, remote client, orchestration.
pub mod segmenter;
/// Filesystem document store and page-text extraction.
pub mod store;

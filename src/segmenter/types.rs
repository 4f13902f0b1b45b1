//! Data model and error definitions for the segmentation pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous span of document content paired with a topic label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based position within the result, contiguous in document order.
    pub id: usize,
    /// Short human-readable label, trimmed of surrounding whitespace.
    pub topic: String,
    /// Segment text, trimmed of leading and trailing whitespace.
    pub content: String,
    /// Tag list; always empty at creation time, tagging happens downstream.
    pub tags: Vec<String>,
}

impl Segment {
    /// Build a segment with the given position, label, and content.
    pub fn new(id: usize, topic: String, content: String) -> Self {
        Self {
            id,
            topic,
            content,
            tags: Vec::new(),
        }
    }
}

/// Outcome of segmenting one document.
///
/// The boundary always returns a well-formed result: failures are carried in
/// `error` alongside an empty segment list rather than as protocol-level
/// failure codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Segments in document order.
    pub segments: Vec<Segment>,
    /// Explanation of why no segments could be produced, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SegmentationResult {
    /// Successful result wrapping the given segments.
    pub fn ok(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            error: None,
        }
    }

    /// Failed result carrying the error description and no segments.
    pub fn failure(error: &SegmentError) -> Self {
        Self {
            segments: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Errors surfaced to the caller as an `error` string on the result object.
///
/// Remote-service unavailability is deliberately absent: it is a routing
/// signal handled inside the pipeline, never reported outward.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// The request named no document at all.
    #[error("no document specified")]
    MissingFilename,
    /// The named document does not exist in the store.
    #[error("document '{0}' not found")]
    NotFound(String),
    /// The document's format is not segmentable.
    #[error("segmentation is not supported for '{0}' documents")]
    UnsupportedFormat(String),
    /// Reading or parsing the document failed.
    #[error("failed to extract document text: {0}")]
    Extraction(String),
}

/// Document formats the local segmenter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Flat text, chunked by blank lines and a line cap.
    PlainText,
    /// Paginated format, one segment per page.
    Pdf,
}

impl DocumentKind {
    /// Classify a document by its filename extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = extension_of(name);
        match extension.as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Lowercased extension of a filename, or the whole name when it has none.
pub(crate) fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_supported_extensions() {
        assert_eq!(DocumentKind::from_name("notes.txt"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_name("REPORT.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("slides.docx"), None);
        assert_eq!(DocumentKind::from_name("noextension"), None);
    }

    #[test]
    fn failure_results_carry_the_message() {
        let result = SegmentationResult::failure(&SegmentError::NotFound("a.txt".into()));
        assert!(result.segments.is_empty());
        assert_eq!(result.error.as_deref(), Some("document 'a.txt' not found"));
    }

    #[test]
    fn error_is_omitted_from_successful_json() {
        let result = SegmentationResult::ok(vec![Segment::new(1, "t".into(), "c".into())]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["segments"][0]["id"], 1);
        assert_eq!(json["segments"][0]["tags"], serde_json::json!([]));
    }
}

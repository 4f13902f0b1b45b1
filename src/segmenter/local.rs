//! Deterministic, format-aware fallback segmentation.
//!
//! Used whenever the external segmentation service is unconfigured or fails.
//! Plain text is chunked on blank lines with a hard line cap; paginated
//! documents become one segment per page. Topics come from the configured
//! [`TopicLabeler`], so with no external service the whole path is
//! deterministic and repeat runs yield identical output.

use crate::labeling::TopicLabeler;
use crate::segmenter::types::Segment;

/// A chunk is closed once it has accumulated this many lines, even without a
/// blank-line boundary.
const MAX_CHUNK_LINES: usize = 20;

/// Partition plain text into chunk contents without labeling them.
///
/// Lines are accumulated with their terminators; a blank line closes the
/// current chunk and is itself discarded, and a chunk that already holds
/// [`MAX_CHUNK_LINES`] lines is closed before the next line is appended.
/// Each emitted chunk is trimmed of surrounding whitespace.
pub(crate) fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut line_count = 0;

    let mut close = |chunk: &mut String, line_count: &mut usize| {
        let content = chunk.trim();
        if !content.is_empty() {
            chunks.push(content.to_string());
        }
        chunk.clear();
        *line_count = 0;
    };

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            close(&mut chunk, &mut line_count);
            continue;
        }
        if line_count >= MAX_CHUNK_LINES {
            close(&mut chunk, &mut line_count);
        }
        chunk.push_str(line);
        line_count += 1;
    }
    close(&mut chunk, &mut line_count);

    chunks
}

/// Segment plain text, labeling each chunk through the given labeler.
pub async fn segment_lines(
    text: &str,
    labeler: &(dyn TopicLabeler + Send + Sync),
) -> Vec<Segment> {
    let mut segments = Vec::new();
    for content in split_chunks(text) {
        let topic = labeler.label(&content).await;
        segments.push(Segment::new(segments.len() + 1, topic, content));
    }
    segments
}

/// Segment a paginated document: one segment per page, id equals page number.
///
/// A page with no extractable text gets a placeholder naming the page so the
/// segment is never silently blank.
pub async fn segment_pages(
    pages: &[String],
    labeler: &(dyn TopicLabeler + Send + Sync),
) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let number = index + 1;
        let trimmed = page.trim();
        let content = if trimmed.is_empty() {
            format!("page {number} has no extractable text")
        } else {
            trimmed.to_string()
        };
        let topic = labeler.label(&content).await;
        segments.push(Segment::new(number, topic, content));
    }
    segments
}

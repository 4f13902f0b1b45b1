//! Client for whole-document segmentation via the external service.

use crate::config::get_config;
use crate::labeling::fallback_topic;
use crate::segmenter::types::{Segment, SegmentationResult};
use serde_json::{Value, json};
use std::time::Duration;

/// Bound on a full-document segmentation call. Longer than the topic-labeling
/// timeout since the service processes the entire document at once.
const SEGMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client asking the external service for a complete segment+topic
/// decomposition.
///
/// Every failure mode — unconfigured endpoint, transport error, timeout,
/// non-success status, malformed body — yields `None`, which routes the
/// request to the local segmenter. Remote instability degrades to local
/// processing rather than surfacing an error to the end user.
pub struct RemoteSegmenter {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl RemoteSegmenter {
    /// Construct a client targeting the given endpoint; `None` disables the
    /// remote path entirely.
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("docseg/0.1")
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    /// Construct a client from the loaded configuration.
    pub fn from_config() -> Self {
        let config = get_config();
        let endpoint = config
            .remote_configured()
            .then(|| config.segment_api_url.clone())
            .flatten();
        Self::new(endpoint, config.segment_api_key.clone())
    }

    /// Request a full segmentation of `full_text`.
    ///
    /// Returns `None` when the service is unconfigured or unusable; this is a
    /// routing signal, not an error.
    pub async fn try_segment(&self, full_text: &str) -> Option<SegmentationResult> {
        let endpoint = self.endpoint.as_deref()?;

        let mut request = self
            .client
            .post(endpoint)
            .timeout(SEGMENT_TIMEOUT)
            .json(&json!({ "text": full_text, "task": "segment" }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "Segmentation service unreachable; falling back");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "Segmentation service returned non-success status; falling back"
            );
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(error = %error, "Unparseable segmentation response; falling back");
                return None;
            }
        };

        let items = match segment_items(&body) {
            Some(items) => items,
            None => {
                tracing::warn!("Segmentation response carried no segment list; falling back");
                return None;
            }
        };

        Some(SegmentationResult::ok(normalize(items)))
    }
}

/// Locate the segment array in the response body.
///
/// Accepted shapes: `{segments: [...]}` or `{data: {segments: [...]}}`. A
/// `segments` field that is present but not an array counts as missing.
fn segment_items(body: &Value) -> Option<&Vec<Value>> {
    body.get("segments")
        .or_else(|| body.get("data").and_then(|data| data.get("segments")))
        .and_then(Value::as_array)
}

/// Normalize raw response elements into segments.
///
/// Elements whose content field is not a string are skipped rather than
/// failing the batch; ids are assigned over the surviving elements so they
/// stay contiguous from 1.
fn normalize(items: &[Value]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(items.len());
    for item in items {
        let content = match content_field(item) {
            Some(content) => content.trim().to_string(),
            None => {
                tracing::debug!("Skipping remote segment with non-string content");
                continue;
            }
        };
        let topic = topic_field(item).unwrap_or_else(|| fallback_topic(&content));
        segments.push(Segment::new(segments.len() + 1, topic, content));
    }
    segments
}

/// Extract the element's content, preferring `content` over `text`.
///
/// Missing fields count as empty content; a present non-string field drops
/// the element.
fn content_field(item: &Value) -> Option<String> {
    for key in ["content", "text"] {
        match item.get(key) {
            Some(Value::String(content)) if !content.is_empty() => return Some(content.clone()),
            Some(Value::String(_)) | Some(Value::Null) | None => continue,
            Some(_) => return None,
        }
    }
    Some(String::new())
}

/// Extract a usable topic from `topic` or `title`, trimmed and non-empty.
fn topic_field(item: &Value) -> Option<String> {
    for key in ["topic", "title"] {
        if let Some(Value::String(topic)) = item.get(key) {
            let trimmed = topic.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    #[tokio::test]
    async fn unconfigured_endpoint_skips_network_entirely() {
        let remote = RemoteSegmenter::new(None, None);
        assert!(remote.try_segment("any text").await.is_none());
    }

    #[tokio::test]
    async fn well_formed_response_is_normalized() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/segment")
                    .json_body_partial(r#"{ "task": "segment" }"#);
                then.status(200).json_body(serde_json::json!({
                    "segments": [
                        { "topic": " Reactors ", "content": "  Reactor design basics.  " },
                        { "title": "Distillation", "text": "Column internals." },
                        { "content": "Untitled body. Rest of it" }
                    ]
                }));
            })
            .await;

        let remote = RemoteSegmenter::new(Some(server.url("/segment")), None);
        let result = remote.try_segment("full document").await.expect("result");

        mock.assert_async().await;
        assert_eq!(result.error, None);
        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0].topic, "Reactors");
        assert_eq!(result.segments[0].content, "Reactor design basics.");
        assert_eq!(result.segments[1].topic, "Distillation");
        assert_eq!(result.segments[1].content, "Column internals.");
        // Missing topic falls back to the local heuristic over the content.
        assert_eq!(result.segments[2].topic, "Untitled body");
        let ids: Vec<usize> = result.segments.iter().map(|segment| segment.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn nested_data_shape_is_accepted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/segment");
                then.status(200).json_body(serde_json::json!({
                    "data": { "segments": [ { "topic": "Only", "content": "Body" } ] }
                }));
            })
            .await;

        let remote = RemoteSegmenter::new(Some(server.url("/segment")), None);
        let result = remote.try_segment("doc").await.expect("result");
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].topic, "Only");
    }

    #[tokio::test]
    async fn non_array_segments_field_falls_back() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/segment");
                then.status(200)
                    .json_body(serde_json::json!({ "segments": "not a list" }));
            })
            .await;

        let remote = RemoteSegmenter::new(Some(server.url("/segment")), None);
        assert!(remote.try_segment("doc").await.is_none());
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/segment");
                then.status(503);
            })
            .await;

        let remote = RemoteSegmenter::new(Some(server.url("/segment")), None);
        assert!(remote.try_segment("doc").await.is_none());
    }

    #[test]
    fn non_string_content_drops_element_but_ids_stay_contiguous() {
        let items = vec![
            serde_json::json!({ "topic": "Kept", "content": "First" }),
            serde_json::json!({ "topic": "Dropped", "content": 42 }),
            serde_json::json!({ "topic": "Also kept", "content": "Third" }),
        ];
        let segments = normalize(&items);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].id, 1);
        assert_eq!(segments[1].id, 2);
        assert_eq!(segments[1].content, "Third");
    }

    #[test]
    fn missing_content_fields_yield_an_empty_segment() {
        let items = vec![serde_json::json!({ "topic": "Bare" })];
        let segments = normalize(&items);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "");
        assert_eq!(segments[0].topic, "Bare");
    }
}

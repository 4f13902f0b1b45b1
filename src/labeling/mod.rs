use crate::config::get_config;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Sentence-terminating markers recognized by the fallback heuristic.
///
/// Covers both CJK fullwidth and ASCII punctuation so Chinese and English
/// documents produce comparable labels.
const SENTENCE_MARKERS: [char; 8] = ['。', '.', '!', '！', '?', '？', ':', '：'];

/// Maximum label length in characters before truncation kicks in.
const MAX_TOPIC_CHARS: usize = 48;

/// Bound on a single topic-labeling call to the external service.
const TOPIC_TIMEOUT: Duration = Duration::from_secs(20);

/// Interface implemented by topic labeling backends.
///
/// Labeling never fails from the caller's perspective: network-backed
/// implementations degrade to the deterministic heuristic internally.
#[async_trait]
pub trait TopicLabeler {
    /// Produce a short topic label for the supplied text span.
    async fn label(&self, text: &str) -> String;
}

/// Derive a topic label without external help.
///
/// Takes the first line of multi-line input (the whole trimmed text otherwise),
/// cuts it at the leftmost sentence-terminating marker, and truncates to
/// [`MAX_TOPIC_CHARS`] characters with a trailing ellipsis when needed.
pub fn fallback_topic(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let trimmed = text.trim();
    let sample = if text.contains('\n') {
        trimmed.lines().next().unwrap_or("")
    } else {
        trimmed
    };

    let sample = match sample.find(|c| SENTENCE_MARKERS.contains(&c)) {
        Some(index) => &sample[..index],
        None => sample,
    };

    if sample.chars().count() > MAX_TOPIC_CHARS {
        let mut truncated: String = sample.chars().take(MAX_TOPIC_CHARS).collect();
        truncated.push('…');
        truncated
    } else {
        sample.to_string()
    }
}

/// Deterministic labeler applying the local heuristic directly.
pub struct FallbackLabeler;

#[async_trait]
impl TopicLabeler for FallbackLabeler {
    async fn label(&self, text: &str) -> String {
        fallback_topic(text)
    }
}

/// Labeler backed by the external segmentation/topic service.
///
/// Every failure mode of the network call maps to the local heuristic; the
/// caller never observes an error.
pub struct RemoteLabeler {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteLabeler {
    /// Construct a labeler targeting the given service endpoint.
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
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

    async fn request_topic(&self, text: &str) -> Option<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(TOPIC_TIMEOUT)
            .json(&json!({ "text": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "Topic service unreachable; using fallback");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "Topic service returned non-success status; using fallback"
            );
            return None;
        }

        let body: Value = response.json().await.ok()?;
        extract_topic(&body)
    }
}

#[async_trait]
impl TopicLabeler for RemoteLabeler {
    async fn label(&self, text: &str) -> String {
        match self.request_topic(text).await {
            Some(topic) => topic,
            None => fallback_topic(text),
        }
    }
}

/// Pull a topic string out of an untyped service response.
///
/// Accepted shapes, tried in priority order with the first match winning:
/// `{topic}`, `{data: {topic}}`, `{result: {title}}`. Shape mismatches never
/// error, they simply yield `None`.
fn extract_topic(body: &Value) -> Option<String> {
    let candidates = [
        body.get("topic"),
        body.get("data").and_then(|data| data.get("topic")),
        body.get("result").and_then(|result| result.get("title")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|topic| !topic.is_empty())
        .map(str::to_string)
}

/// Build a topic labeler suitable for the current configuration.
pub fn topic_labeler() -> Box<dyn TopicLabeler + Send + Sync> {
    let config = get_config();
    match (&config.segment_api_url, config.remote_configured()) {
        (Some(url), true) => {
            tracing::debug!(endpoint = %url, "Using remote topic labeler");
            Box::new(RemoteLabeler::new(
                url.clone(),
                config.segment_api_key.clone(),
            ))
        }
        _ => Box::new(FallbackLabeler),
    }
}

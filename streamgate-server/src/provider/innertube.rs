//! Innertube provider adapter
//!
//! Talks to the YouTube Innertube API over plain HTTPS (player lookup and
//! search). The response shape is not stable across client versions, so
//! field access goes through fallback chains (`adaptiveFormats` /
//! `adaptive_formats` / `formats`, `mimeType` / `mime_type`, ...), keeping
//! the superset of shapes the gateway has been observed to receive.
//!
//! Failure classification lives here: playability status codes and reason
//! text are translated into [`ProviderErrorKind`] so the gateway never
//! dispatches on raw provider strings.

use super::{
    MediaProvider, ProviderError, ProviderErrorKind, RawFormat, RawSearchItem, VideoMetadata,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.youtube.com/youtubei/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Innertube requires a client context on every call. The Android client
// returns direct stream URLs for most videos, which keeps cipher handling
// on the fallback path.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "19.09.37";

/// Provider adapter for the Innertube API
///
/// Holds a single `reqwest::Client`, which is stateless after construction
/// and shared across all concurrent calls.
pub struct InnertubeProvider {
    client: reqwest::Client,
    base_url: String,
}

impl InnertubeProvider {
    /// Create a provider with the default endpoint and timeout
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider against a custom endpoint (used by deployments
    /// fronting Innertube with a proxy, and by tests)
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Other, e.to_string()))?;

        Ok(InnertubeProvider {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn context() -> Value {
        json!({
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
                "androidSdkVersion": 30,
                "hl": "ko",
                "gl": "KR",
            }
        })
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        if !response.status().is_success() {
            return Err(ProviderError::new(
                ProviderErrorKind::Other,
                format!("provider returned HTTP {}", response.status()),
            ));
        }

        response.json().await.map_err(classify_transport)
    }
}

#[async_trait]
impl MediaProvider for InnertubeProvider {
    async fn video_info(&self, video_id: &str) -> Result<VideoMetadata, ProviderError> {
        let body = json!({
            "videoId": video_id,
            "context": Self::context(),
            "contentCheckOk": true,
            "racyCheckOk": true,
        });

        let info = self.post("player", body).await?;
        check_playability(&info)?;

        let formats = collect_formats(&info);
        if formats.is_empty() {
            return Err(ProviderError::new(
                ProviderErrorKind::NoStreamingData,
                "no streaming data in player response",
            ));
        }

        Ok(VideoMetadata {
            title: string_fallback(&info, &["videoDetails.title", "basic_info.title"])
                .unwrap_or_default(),
            author: string_fallback(
                &info,
                &[
                    "videoDetails.author",
                    "videoDetails.ownerChannelName",
                    "basic_info.author",
                ],
            )
            .unwrap_or_default(),
            duration_seconds: string_fallback(
                &info,
                &["videoDetails.lengthSeconds", "basic_info.duration"],
            )
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
            formats,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<RawSearchItem>, ProviderError> {
        let body = json!({
            "query": query,
            "context": Self::context(),
        });

        let response = self.post("search", body).await?;

        let mut items = Vec::new();
        collect_video_renderers(&response, &mut items);
        Ok(items)
    }
}

/// Translation table from playability status to error kinds
///
/// `reason` is the human-readable text Innertube attaches; it is only
/// consulted where a status code is ambiguous.
fn check_playability(info: &Value) -> Result<(), ProviderError> {
    let status = info
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
        .unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = info
        .pointer("/playabilityStatus/reason")
        .and_then(Value::as_str)
        .unwrap_or("");

    let kind = match status {
        "LOGIN_REQUIRED" if reason.contains("age") || reason.contains("Sign in to confirm") => {
            ProviderErrorKind::AgeRestricted
        }
        "LOGIN_REQUIRED" => ProviderErrorKind::PrivateVideo,
        "LIVE_STREAM_OFFLINE" => ProviderErrorKind::LiveUnsupported,
        "UNPLAYABLE" if reason.contains("live") => ProviderErrorKind::LiveUnsupported,
        "UNPLAYABLE" | "ERROR" if reason.contains("Private") => ProviderErrorKind::PrivateVideo,
        "UNPLAYABLE" | "ERROR" => ProviderErrorKind::VideoUnavailable,
        _ => ProviderErrorKind::Other,
    };

    Err(ProviderError::new(
        kind,
        format!("playability {status}: {reason}"),
    ))
}

fn classify_transport(err: reqwest::Error) -> ProviderError {
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout
    } else if err.is_connect() || err.is_request() {
        ProviderErrorKind::Network
    } else {
        ProviderErrorKind::Other
    };
    ProviderError::new(kind, err.to_string())
}

/// Gather every format variant the response offers, across all known
/// field locations, adaptive formats first (they carry the audio-only
/// variants)
fn collect_formats(info: &Value) -> Vec<RawFormat> {
    const LOCATIONS: [&str; 6] = [
        "/streamingData/adaptiveFormats",
        "/streamingData/formats",
        "/streaming_data/adaptive_formats",
        "/streaming_data/formats",
        "/adaptiveFormats",
        "/formats",
    ];

    let mut formats = Vec::new();
    for location in LOCATIONS {
        if let Some(list) = info.pointer(location).and_then(Value::as_array) {
            formats.extend(list.iter().map(parse_format));
        }
    }
    formats
}

fn parse_format(raw: &Value) -> RawFormat {
    RawFormat {
        mime_type: string_fallback(raw, &["mimeType", "mime_type"]).unwrap_or_default(),
        bitrate: number_fallback(raw, &["bitrate", "averageBitrate", "average_bitrate"])
            .unwrap_or(0),
        quality: string_fallback(raw, &["qualityLabel", "quality", "audioQuality"]),
        url: string_fallback(raw, &["url"]),
        cipher: string_fallback(raw, &["signatureCipher", "cipher"]),
    }
}

/// Depth-first walk collecting every `videoRenderer` in document order,
/// which is the provider's relevance order
fn collect_video_renderers(value: &Value, out: &mut Vec<RawSearchItem>) {
    match value {
        Value::Object(map) => {
            if let Some(renderer) = map.get("videoRenderer") {
                if let Some(item) = parse_video_renderer(renderer) {
                    out.push(item);
                }
            }
            for child in map.values() {
                collect_video_renderers(child, out);
            }
        }
        Value::Array(list) => {
            for child in list {
                collect_video_renderers(child, out);
            }
        }
        _ => {}
    }
}

fn parse_video_renderer(renderer: &Value) -> Option<RawSearchItem> {
    let video_id = renderer.get("videoId")?.as_str()?.to_string();

    Some(RawSearchItem {
        video_id,
        title: runs_text(renderer.get("title")).unwrap_or_default(),
        description: runs_text(renderer.get("detailedMetadataSnippets").and_then(|s| {
            s.as_array()?.first()?.get("snippetText")
        }))
        .or_else(|| runs_text(renderer.get("descriptionSnippet")))
        .unwrap_or_default(),
        channel_title: runs_text(renderer.get("ownerText"))
            .or_else(|| runs_text(renderer.get("longBylineText")))
            .unwrap_or_default(),
        thumbnail_url: renderer
            .pointer("/thumbnail/thumbnails")
            .and_then(Value::as_array)
            .and_then(|t| t.last())
            .and_then(|t| t.get("url"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        published_ago: simple_text(renderer.get("publishedTimeText")).unwrap_or_default(),
        duration_label: simple_text(renderer.get("lengthText")).unwrap_or_default(),
        view_count: simple_text(renderer.get("viewCountText"))
            .map(|text| parse_view_count(&text))
            .unwrap_or(0),
    })
}

/// Join the `runs` of a text object, falling back to `simpleText`
fn runs_text(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if let Some(runs) = value.get("runs").and_then(Value::as_array) {
        let text: String = runs
            .iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect();
        if !text.is_empty() {
            return Some(text);
        }
    }
    value.get("simpleText").and_then(Value::as_str).map(String::from)
}

fn simple_text(value: Option<&Value>) -> Option<String> {
    runs_text(value)
}

/// "1,234,567 views" -> 1234567
fn parse_view_count(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Try `paths` in order against dotted object paths, returning the first
/// non-empty string (numbers are stringified, matching providers that
/// return durations as either)
fn string_fallback(value: &Value, paths: &[&str]) -> Option<String> {
    for path in paths {
        match lookup(value, path) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn number_fallback(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playability_classification() {
        let cases = [
            ("UNPLAYABLE", "Video unavailable", ProviderErrorKind::VideoUnavailable),
            ("ERROR", "Private video", ProviderErrorKind::PrivateVideo),
            (
                "LOGIN_REQUIRED",
                "Sign in to confirm your age",
                ProviderErrorKind::AgeRestricted,
            ),
            ("LOGIN_REQUIRED", "", ProviderErrorKind::PrivateVideo),
            ("LIVE_STREAM_OFFLINE", "", ProviderErrorKind::LiveUnsupported),
            (
                "UNPLAYABLE",
                "This live event has ended",
                ProviderErrorKind::LiveUnsupported,
            ),
        ];

        for (status, reason, expected) in cases {
            let info = json!({ "playabilityStatus": { "status": status, "reason": reason } });
            let err = check_playability(&info).unwrap_err();
            assert_eq!(err.kind, expected, "status={status} reason={reason}");
        }

        assert!(check_playability(&json!({ "playabilityStatus": { "status": "OK" } })).is_ok());
        // Missing playability block counts as OK; format checks come later
        assert!(check_playability(&json!({})).is_ok());
    }

    #[test]
    fn test_collect_formats_field_fallbacks() {
        // camelCase streamingData
        let camel = json!({
            "streamingData": {
                "adaptiveFormats": [
                    { "mimeType": "audio/webm", "bitrate": 128_000, "url": "https://a" }
                ]
            }
        });
        let formats = collect_formats(&camel);
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].mime_type, "audio/webm");
        assert_eq!(formats[0].bitrate, 128_000);

        // snake_case variant with cipher and averageBitrate
        let snake = json!({
            "streaming_data": {
                "adaptive_formats": [
                    {
                        "mime_type": "audio/mp4",
                        "averageBitrate": 96_000,
                        "signatureCipher": "s=abc&url=https%3A%2F%2Fb"
                    }
                ]
            }
        });
        let formats = collect_formats(&snake);
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].mime_type, "audio/mp4");
        assert_eq!(formats[0].bitrate, 96_000);
        assert!(formats[0].url.is_none());
        assert!(formats[0].cipher.is_some());
    }

    #[test]
    fn test_parse_video_renderer() {
        let renderer = json!({
            "videoId": "dQw4w9WgXcQ",
            "title": { "runs": [{ "text": "Never Gonna " }, { "text": "Give You Up" }] },
            "descriptionSnippet": { "runs": [{ "text": "official video" }] },
            "ownerText": { "runs": [{ "text": "Rick Astley" }] },
            "thumbnail": { "thumbnails": [
                { "url": "https://i/default.jpg" },
                { "url": "https://i/hq.jpg" }
            ]},
            "publishedTimeText": { "simpleText": "14 years ago" },
            "lengthText": { "simpleText": "3:33" },
            "viewCountText": { "simpleText": "1,234,567 views" }
        });

        let item = parse_video_renderer(&renderer).unwrap();
        assert_eq!(item.video_id, "dQw4w9WgXcQ");
        assert_eq!(item.title, "Never Gonna Give You Up");
        assert_eq!(item.description, "official video");
        assert_eq!(item.channel_title, "Rick Astley");
        assert_eq!(item.thumbnail_url, "https://i/hq.jpg");
        assert_eq!(item.published_ago, "14 years ago");
        assert_eq!(item.duration_label, "3:33");
        assert_eq!(item.view_count, 1_234_567);
    }

    #[test]
    fn test_collect_video_renderers_preserves_order() {
        let response = json!({
            "contents": [
                { "videoRenderer": { "videoId": "aaaaaaaaaaa" } },
                { "adSlotRenderer": {} },
                { "nested": { "videoRenderer": { "videoId": "bbbbbbbbbbb" } } }
            ]
        });

        let mut items = Vec::new();
        collect_video_renderers(&response, &mut items);
        let ids: Vec<_> = items.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
    }

    #[test]
    fn test_parse_view_count() {
        assert_eq!(parse_view_count("1,234,567 views"), 1_234_567);
        assert_eq!(parse_view_count("조회수 1,234회"), 1_234);
        assert_eq!(parse_view_count("No views"), 0);
    }
}

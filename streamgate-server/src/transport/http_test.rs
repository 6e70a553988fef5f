#[cfg(test)]
mod tests {
    use crate::types::{
        ErrorResponse, SearchRequest, SearchResponse, StreamRequest, StreamResponse,
    };

    #[tokio::test]
    async fn test_stream_request_wire_shape() {
        // camelCase on the wire
        let request: StreamRequest = serde_json::from_str(r#"{"videoId": "dQw4w9WgXcQ"}"#).unwrap();
        assert_eq!(request.video_id, "dQw4w9WgXcQ");

        // Absent videoId deserializes to empty (rejected later by validation)
        let request: StreamRequest = serde_json::from_str("{}").unwrap();
        assert!(request.video_id.is_empty());
    }

    #[tokio::test]
    async fn test_stream_response_wire_shape() {
        let response_json = r#"{
            "success": true,
            "streamUrl": "https://example.com/audio",
            "videoInfo": { "title": "곡 제목", "duration": 213, "author": "artist" },
            "format": { "quality": "AUDIO_QUALITY_MEDIUM", "audioBitrate": 128000 }
        }"#;

        let response: StreamResponse = serde_json::from_str(response_json).unwrap();
        assert!(response.success);
        assert_eq!(response.stream_url, "https://example.com/audio");
        assert_eq!(response.video_info.duration, 213);
        assert_eq!(response.format.audio_bitrate, 128000);
    }

    #[tokio::test]
    async fn test_search_request_defaults() {
        let request: SearchRequest = serde_json::from_str(r#"{"query": "노래방"}"#).unwrap();
        assert_eq!(request.query, "노래방");
        assert_eq!(request.max_results, None);

        let request: SearchRequest =
            serde_json::from_str(r#"{"query": "노래방", "maxResults": 5}"#).unwrap();
        assert_eq!(request.max_results, Some(5));
    }

    #[tokio::test]
    async fn test_search_response_wire_shape() {
        let response_json = r#"{
            "success": true,
            "items": [{
                "videoId": "dQw4w9WgXcQ",
                "title": "title",
                "description": "",
                "channelTitle": "channel",
                "thumbnailUrl": "https://i/hq.jpg",
                "publishedAgo": "1 year ago",
                "durationLabel": "3:33",
                "viewCount": 42
            }],
            "searchInfo": {
                "totalResults": 15,
                "searchType": "video",
                "query": "노래방",
                "processingTimeMs": 120
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(response_json).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(response.search_info.total_results, 15);
    }

    #[tokio::test]
    async fn test_error_response_wire_shape() {
        let error = ErrorResponse {
            success: false,
            code: "rate_limited".to_string(),
            error: "요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""success":false"#));
        assert!(json.contains(r#""code":"rate_limited""#));
    }
}

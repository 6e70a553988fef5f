//! Gateway error taxonomy
//!
//! Every failure the gateway can report maps to one variant here. Callers
//! receive a stable machine code plus a short localized message; raw
//! provider messages and internal details stay in the logs.

use crate::provider::{ProviderError, ProviderErrorKind};
use streamgate::RateLimitError;
use thiserror::Error;

/// Maximum accepted search query length, in characters
pub const MAX_QUERY_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No caller identity was supplied
    #[error("authentication required")]
    Unauthenticated,

    /// A required request parameter was absent
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The video id is not an 11-character `[A-Za-z0-9_-]` token
    #[error("invalid video id format")]
    InvalidVideoId,

    /// The search query was empty after trimming
    #[error("search query is empty")]
    EmptyQuery,

    /// The search query exceeded [`MAX_QUERY_LEN`] characters
    #[error("search query too long: {0} characters")]
    QueryTooLong(usize),

    /// The rate limiter denied the request
    #[error("rate limited: {0}")]
    RateLimited(#[from] RateLimitError),

    /// The provider lookup or search call failed
    #[error("provider lookup failed: {0}")]
    ProviderLookupFailed(#[from] ProviderError),

    /// No audio format yielded a usable URL
    #[error("no playable audio stream")]
    NoPlayableStream,

    /// The search returned no result list
    #[error("no search results")]
    NoSearchResults,

    /// An internal failure (actor channel, serialization, ...)
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable machine-readable code for the wire
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated => "unauthenticated",
            GatewayError::MissingParameter(_)
            | GatewayError::InvalidVideoId
            | GatewayError::EmptyQuery
            | GatewayError::QueryTooLong(_) => "invalid_input",
            GatewayError::RateLimited(_) => "rate_limited",
            GatewayError::ProviderLookupFailed(_) => "provider_lookup_failed",
            GatewayError::NoPlayableStream => "no_playable_stream",
            GatewayError::NoSearchResults => "no_search_results",
            GatewayError::Internal(_) => "internal",
        }
    }

    /// Short localized message for the caller
    ///
    /// Messages match the original Korean-language service. Nothing in
    /// here carries provider internals or stack detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated => "로그인이 필요합니다",
            GatewayError::MissingParameter(_) => "비디오 ID가 필요합니다",
            GatewayError::InvalidVideoId => "유효하지 않은 비디오 ID 형식입니다",
            GatewayError::EmptyQuery => "검색어가 필요합니다",
            GatewayError::QueryTooLong(_) => "검색어가 너무 깁니다 (최대 100자)",
            GatewayError::RateLimited(RateLimitError::TemporarilyBanned { .. }) => {
                "너무 많은 요청으로 일시적으로 차단되었습니다. 10분 후 다시 시도해주세요."
            }
            GatewayError::RateLimited(_) => "요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.",
            GatewayError::ProviderLookupFailed(e) => match e.kind {
                ProviderErrorKind::VideoUnavailable => {
                    "비디오를 사용할 수 없습니다 (비공개 또는 삭제됨)"
                }
                ProviderErrorKind::PrivateVideo => "비공개 비디오입니다",
                ProviderErrorKind::AgeRestricted => "연령 제한된 콘텐츠입니다",
                ProviderErrorKind::LiveUnsupported => "라이브 스트림은 지원되지 않습니다",
                ProviderErrorKind::NoStreamingData => {
                    "YouTube에서 스트림 정보를 추출할 수 없습니다"
                }
                ProviderErrorKind::Timeout => "요청 시간이 초과되었습니다. 다시 시도해주세요",
                ProviderErrorKind::Network => {
                    "네트워크 연결에 문제가 있습니다. 다시 시도해주세요"
                }
                ProviderErrorKind::Other => "스트림 URL 추출에 실패했습니다",
            },
            GatewayError::NoPlayableStream => "재생 가능한 오디오 스트림을 찾을 수 없습니다",
            GatewayError::NoSearchResults => "검색 결과를 찾을 수 없습니다",
            GatewayError::Internal(_) => "요청 처리에 실패했습니다",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use std::time::Duration;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(GatewayError::Unauthenticated.code(), "unauthenticated");
        assert_eq!(GatewayError::InvalidVideoId.code(), "invalid_input");
        assert_eq!(GatewayError::QueryTooLong(101).code(), "invalid_input");
        assert_eq!(
            GatewayError::RateLimited(RateLimitError::QuotaExceeded).code(),
            "rate_limited"
        );
        assert_eq!(GatewayError::NoPlayableStream.code(), "no_playable_stream");
    }

    #[test]
    fn test_rate_limit_messages_differ_by_kind() {
        let quota = GatewayError::RateLimited(RateLimitError::QuotaExceeded);
        let banned = GatewayError::RateLimited(RateLimitError::TemporarilyBanned {
            retry_after: Duration::from_secs(600),
        });
        assert_ne!(quota.user_message(), banned.user_message());
    }

    #[test]
    fn test_provider_message_hides_raw_detail() {
        let err = GatewayError::ProviderLookupFailed(ProviderError::new(
            ProviderErrorKind::VideoUnavailable,
            "playability UNPLAYABLE: Video unavailable in your country",
        ));
        assert!(!err.user_message().contains("UNPLAYABLE"));
    }
}

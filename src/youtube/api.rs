use super::{ProviderError, SearchHit, VideoDetails, VideoSource};
use crate::config::YouTubeConfig;
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// YouTube Data API v3 client
pub struct YouTubeDataApi {
    config: YouTubeConfig,
    api_key: String,
    client: reqwest::Client,
}

// Documentation: https://developers.google.com/youtube/v3/docs

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "channelId", default)]
    channel_id: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount", default, deserialize_with = "deserialize_count")]
    view_count: u64,
    #[serde(rename = "likeCount", default, deserialize_with = "deserialize_count")]
    like_count: u64,
    #[serde(rename = "commentCount", default, deserialize_with = "deserialize_count")]
    comment_count: u64,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount", default, deserialize_with = "deserialize_count")]
    subscriber_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

/// The API reports counts as decimal strings; accept numbers too
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Text(text)) => text.trim().parse().unwrap_or(0),
        Some(Count::Number(n)) => n,
        None => 0,
    })
}

fn entity_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|quot|apos|lt|gt|amp);").ok())
        .as_ref()
}

/// Search snippets come back HTML-escaped ("Don&#39;t", "Tom &amp; Jerry").
/// Decodes in a single pass, so "&#38;lt;" becomes "&lt;" and not "<".
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let Some(pattern) = entity_regex() else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "quot" => Some('"'),
                "apos" => Some('\''),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                _ => {
                    let code = &entity[1..];
                    let value = match code.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => code.parse::<u32>().ok(),
                    };
                    value.and_then(char::from_u32)
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Map an error response onto a [`ProviderError`]
fn classify_error(status: u16, body: &str) -> ProviderError {
    let (message, reasons) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope.error.message,
            envelope.error.errors.into_iter().map(|e| e.reason).collect::<Vec<_>>(),
        ),
        Err(_) => (body.trim().to_string(), Vec::new()),
    };

    let has_reason = |candidates: &[&str]| reasons.iter().any(|r| candidates.contains(&r.as_str()));

    if has_reason(&["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded", "userRateLimitExceeded"]) {
        ProviderError::QuotaExceeded(message)
    } else if status == 401
        || has_reason(&["keyInvalid", "keyExpired", "accessNotConfigured", "ipRefererBlocked"])
        || message.contains("API key not valid")
    {
        ProviderError::Unauthorized(message)
    } else {
        ProviderError::Api { status, message }
    }
}

impl YouTubeDataApi {
    pub fn new(config: YouTubeConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let base = format!("{}/{}", self.config.base_url.trim_end_matches('/'), resource);
        let mut url = Url::parse_with_params(&base, params)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoSource for YouTubeDataApi {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, ProviderError> {
        let max_results = max_results.to_string();
        let url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("videoDuration", "any"),
            ],
        )?;

        debug!("Searching YouTube for '{}'", query);
        let response: SearchListResponse = self.get_json(url).await?;

        let hits = response
            .items
            .into_iter()
            .filter_map(|item| {
                let Some(video_id) = item.id.video_id else {
                    debug!("Skipping search result without a video id");
                    return None;
                };
                let snippet = item.snippet.unwrap_or_default();
                Some(SearchHit {
                    video_id,
                    title: decode_html_entities(&snippet.title),
                    channel_title: decode_html_entities(&snippet.channel_title),
                    channel_id: snippet.channel_id,
                    published_at: snippet.published_at,
                })
            })
            .collect();

        Ok(hits)
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ProviderError> {
        let url = self.endpoint("videos", &[("part", "contentDetails,statistics"), ("id", video_id)])?;
        let response: VideoListResponse = self.get_json(url).await?;

        Ok(response.items.into_iter().next().map(|item| {
            let statistics = item.statistics.unwrap_or_default();
            VideoDetails {
                duration_code: item.content_details.and_then(|d| d.duration),
                view_count: statistics.view_count,
                like_count: statistics.like_count,
                comment_count: statistics.comment_count,
            }
        }))
    }

    async fn channel_subscribers(&self, channel_id: &str) -> Result<u64, ProviderError> {
        let url = self.endpoint("channels", &[("part", "statistics"), ("id", channel_id)])?;
        let response: ChannelListResponse = self.get_json(url).await?;

        match response.items.into_iter().next().and_then(|item| item.statistics) {
            Some(statistics) => Ok(statistics.subscriber_count),
            None => {
                warn!("No statistics for channel {}, counting 0 subscribers", channel_id);
                Ok(0)
            }
        }
    }

    fn name(&self) -> &str {
        "youtube-data-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_decode_search_response() {
        let body = r#"{
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "abc"},
                    "snippet": {
                        "title": "Don&#39;t miss this &amp; that",
                        "channelTitle": "Chan &quot;One&quot;",
                        "channelId": "UC1",
                        "publishedAt": "2024-02-01T12:00:00Z"
                    }
                },
                {"id": {"kind": "youtube#channel", "channelId": "UC2"}}
            ]
        }"#;

        let response: SearchListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].id.video_id.as_deref(), Some("abc"));
        assert!(response.items[1].id.video_id.is_none());
    }

    #[test]
    fn test_decode_video_statistics() {
        let body = r#"{
            "items": [{
                "contentDetails": {"duration": "PT4M13S"},
                "statistics": {"viewCount": "12345", "likeCount": "678", "favoriteCount": "0"}
            }]
        }"#;

        let response: VideoListResponse = serde_json::from_str(body).unwrap();
        let item = &response.items[0];
        let stats = item.statistics.as_ref().unwrap();
        assert_eq!(item.content_details.as_ref().unwrap().duration.as_deref(), Some("PT4M13S"));
        assert_eq!(stats.view_count, 12_345);
        assert_eq!(stats.like_count, 678);
        // hidden comment counts are simply absent
        assert_eq!(stats.comment_count, 0);
    }

    #[test]
    fn test_decode_channel_statistics() {
        let body = r#"{"items": [{"statistics": {"subscriberCount": "1500000", "hiddenSubscriberCount": false}}]}"#;
        let response: ChannelListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.items[0].statistics.as_ref().unwrap().subscriber_count, 1_500_000);

        let body = r#"{"items": [{"statistics": {"hiddenSubscriberCount": true}}]}"#;
        let response: ChannelListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.items[0].statistics.as_ref().unwrap().subscriber_count, 0);
    }

    #[test]
    fn test_html_entities() {
        assert_eq!(decode_html_entities("Don&#39;t &amp; won&#x27;t"), "Don't & won't");
        assert_eq!(decode_html_entities("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
        assert_eq!(decode_html_entities("plain title"), "plain title");
        assert_eq!(decode_html_entities("&amp;quot;"), "&quot;");
        assert_eq!(decode_html_entities("&#38;lt;"), "&lt;");
        assert_eq!(decode_html_entities("Tom &#x26;amp; Jerry"), "Tom &amp; Jerry");
        assert_eq!(decode_html_entities("&#xFFFFFFFF; &nbsp;"), "&#xFFFFFFFF; &nbsp;");
    }

    #[test]
    fn test_classify_quota_error() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota.", "errors": [{"reason": "quotaExceeded", "domain": "youtube.quota"}]}}"#;
        assert!(matches!(classify_error(403, body), ProviderError::QuotaExceeded(_)));
    }

    #[test]
    fn test_classify_auth_errors() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "errors": [{"reason": "badRequest"}]}}"#;
        assert!(matches!(classify_error(400, body), ProviderError::Unauthorized(_)));
        assert!(matches!(classify_error(401, "unauthorized"), ProviderError::Unauthorized(_)));
    }

    #[test]
    fn test_classify_other_errors() {
        match classify_error(500, "backend exploded") {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let config = ConfigBuilder::new()
            .with_api_key("secret")
            .with_base_url("https://example.test/youtube/v3/")
            .build();
        let api = YouTubeDataApi::new(config.youtube).unwrap();

        let url = api.endpoint("search", &[("q", "Hindi Travel & Food")]).unwrap();
        assert_eq!(url.path(), "/youtube/v3/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("q".to_string(), "Hindi Travel & Food".to_string()));
        assert_eq!(pairs[1], ("key".to_string(), "secret".to_string()));
    }
}

//! YouTube Data API v3 client for video metadata.

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::{YoutubeError, YoutubeResult};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Metadata for a single video as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub platform_video_id: String,
    pub title: String,
    /// Empty string when the platform reports no description.
    pub description: String,
    /// ISO-8601 duration string, e.g. `PT4M13S`.
    pub duration: String,
    /// String-encoded integer, `"0"` when absent.
    pub view_count: String,
    /// Highest-resolution thumbnail available, empty string if none.
    pub thumbnail_url: String,
}

/// Data API v3 client.
pub struct DataApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl DataApiClient {
    /// Create a client against the production API. A missing key is allowed
    /// here and surfaces as an error on first use.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests).
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Fetch snippet, statistics, and content-detail facets for one video.
    pub async fn fetch_video(&self, video_id: &str) -> YoutubeResult<VideoDetails> {
        let api_key = self.api_key.as_deref().ok_or(YoutubeError::MissingApiKey)?;

        let url = format!("{}/videos", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet,statistics,contentDetails"),
                ("id", video_id),
                ("key", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(YoutubeError::Api(format!("{}: {}", status, body)));
        }

        let listing: VideoListResponse = response
            .json()
            .await
            .map_err(|e| YoutubeError::InvalidResponse(e.to_string()))?;

        let item = listing
            .items
            .into_iter()
            .next()
            .ok_or(YoutubeError::VideoNotFound)?;

        info!(video_id, "Fetched video metadata");

        Ok(VideoDetails {
            platform_video_id: video_id.to_string(),
            title: item.snippet.title,
            description: item.snippet.description,
            duration: item.content_details.duration,
            view_count: item.statistics.view_count.unwrap_or_else(|| "0".to_string()),
            thumbnail_url: item.snippet.thumbnails.map(Thumbnails::best_url).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(rename = "contentDetails", default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    maxres: Option<Thumbnail>,
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    default_size: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    /// Size-preference order: maxres, high, medium, default.
    fn best_url(self) -> String {
        self.maxres
            .or(self.high)
            .or(self.medium)
            .or(self.default_size)
            .map(|t| t.url)
            .unwrap_or_default()
    }
}

//! Captions retrieval via the unofficial InnerTube player API.
//!
//! Flow: POST the player endpoint to list caption tracks, then fetch the
//! first track's timedtext payload in `json3` format and flatten its
//! event/segment structure into one whitespace-normalized string.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{TranscriptError, TranscriptResult};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
const ANDROID_CLIENT_VERSION: &str = "20.10.38";

/// Transcripts shorter than this are treated as garbage and rejected.
const MIN_TRANSCRIPT_CHARS: usize = 10;

/// Client for the captions-retrieval API.
pub struct TranscriptClient {
    client: Client,
    base_url: String,
}

impl Default for TranscriptClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch and flatten the transcript for a video.
    pub async fn fetch_transcript(&self, video_id: &str) -> TranscriptResult<String> {
        let player = self.fetch_player_data(video_id).await?;
        assert_playable(&player)?;

        let track_url =
            first_caption_track_url(&player).ok_or(TranscriptError::CaptionsUnavailable)?;

        let timed_text = self.fetch_track(&track_url).await?;
        let text = flatten_events(&timed_text);

        if text.len() < MIN_TRANSCRIPT_CHARS {
            return Err(TranscriptError::TooShort);
        }

        info!(video_id, chars = text.len(), "Fetched transcript");
        Ok(text)
    }

    async fn fetch_player_data(&self, video_id: &str) -> TranscriptResult<Value> {
        let url = format!("{}/youtubei/v1/player", self.base_url);
        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(TranscriptError::InvalidResponse(format!(
                "player endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranscriptError::InvalidResponse(e.to_string()))
    }

    async fn fetch_track(&self, track_url: &str) -> TranscriptResult<TimedText> {
        let separator = if track_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}fmt=json3", track_url, separator);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(TranscriptError::InvalidResponse(format!(
                "timedtext endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranscriptError::InvalidResponse(e.to_string()))
    }
}

/// Reject videos the player reports as unplayable before looking for tracks.
fn assert_playable(player: &Value) -> TranscriptResult<()> {
    let Some(status) = player.pointer("/playabilityStatus/status").and_then(Value::as_str) else {
        return Ok(());
    };
    if status == "OK" {
        return Ok(());
    }

    let reason = player
        .pointer("/playabilityStatus/reason")
        .and_then(Value::as_str)
        .unwrap_or(status);
    Err(TranscriptError::NotPlayable(reason.to_string()))
}

/// Base URL of the first listed caption track, if any.
fn first_caption_track_url(player: &Value) -> Option<String> {
    player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")?
        .as_array()?
        .first()?
        .get("baseUrl")?
        .as_str()
        .map(|s| s.to_string())
}

/// Timedtext payload in `json3` format.
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TextEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct TextEvent {
    #[serde(default)]
    segs: Vec<TextSegment>,
}

#[derive(Debug, Default, Deserialize)]
struct TextSegment {
    #[serde(default)]
    utf8: String,
}

/// Join all segment runs, collapse whitespace runs to a single space, trim.
fn flatten_events(timed_text: &TimedText) -> String {
    let joined = timed_text
        .events
        .iter()
        .map(|event| {
            event
                .segs
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn player_response(server_uri: &str) -> Value {
        json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        { "baseUrl": format!("{}/api/timedtext?lang=en&v=abc", server_uri) }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_flatten_events_normalizes_whitespace() {
        let timed_text = TimedText {
            events: vec![
                TextEvent {
                    segs: vec![
                        TextSegment { utf8: "hello ".to_string() },
                        TextSegment { utf8: " world".to_string() },
                    ],
                },
                TextEvent { segs: vec![TextSegment { utf8: "\n".to_string() }] },
                TextEvent {
                    segs: vec![TextSegment { utf8: "again\nand  again".to_string() }],
                },
            ],
        };

        assert_eq!(flatten_events(&timed_text), "hello world again and again");
    }

    #[tokio::test]
    async fn test_fetch_transcript_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/youtubei/v1/player"))
            .respond_with(ResponseTemplate::new(200).set_body_json(player_response(&server.uri())))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .and(query_param("fmt", "json3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [
                    { "segs": [{ "utf8": "welcome to" }, { "utf8": " the show" }] },
                    { "segs": [{ "utf8": "today we talk about rust" }] }
                ]
            })))
            .mount(&server)
            .await;

        let client = TranscriptClient::with_base_url(server.uri());
        let transcript = client.fetch_transcript("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript, "welcome to the show today we talk about rust");
    }

    #[tokio::test]
    async fn test_no_captions_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/youtubei/v1/player"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "playabilityStatus": { "status": "OK" }
            })))
            .mount(&server)
            .await;

        let client = TranscriptClient::with_base_url(server.uri());
        let result = client.fetch_transcript("dQw4w9WgXcQ").await;
        assert!(matches!(result, Err(TranscriptError::CaptionsUnavailable)));
    }

    #[tokio::test]
    async fn test_unplayable_video_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/youtubei/v1/player"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "playabilityStatus": {
                    "status": "LOGIN_REQUIRED",
                    "reason": "This video is private"
                }
            })))
            .mount(&server)
            .await;

        let client = TranscriptClient::with_base_url(server.uri());
        let result = client.fetch_transcript("dQw4w9WgXcQ").await;
        match result {
            Err(TranscriptError::NotPlayable(reason)) => {
                assert_eq!(reason, "This video is private");
            }
            other => panic!("expected NotPlayable, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_near_empty_transcript_is_too_short() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/youtubei/v1/player"))
            .respond_with(ResponseTemplate::new(200).set_body_json(player_response(&server.uri())))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [{ "segs": [{ "utf8": "hi" }] }]
            })))
            .mount(&server)
            .await;

        let client = TranscriptClient::with_base_url(server.uri());
        let result = client.fetch_transcript("dQw4w9WgXcQ").await;
        assert!(matches!(result, Err(TranscriptError::TooShort)));
    }
}

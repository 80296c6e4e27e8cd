//! YouTube client error types.

use thiserror::Error;

/// Result type for Data API operations.
pub type YoutubeResult<T> = Result<T, YoutubeError>;

/// Errors from the catalog metadata fetch.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// The queried ID returned no item: removed, private, or nonexistent.
    #[error("Video not found or is not publicly accessible")]
    VideoNotFound,

    #[error("YouTube API key is not configured")]
    MissingApiKey,

    #[error("YouTube API request failed: {0}")]
    Api(String),

    #[error("Invalid YouTube API response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result type for transcript operations.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Errors from the captions/transcript fetch. All of these are non-fatal to
/// the pipeline, which substitutes fallback text instead.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("No captions available for this video")]
    CaptionsUnavailable,

    #[error("Video is not playable: {0}")]
    NotPlayable(String),

    #[error("Transcript content too short or empty")]
    TooShort,

    #[error("Invalid transcript response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

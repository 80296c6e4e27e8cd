//! YouTube clients for the TubeSEO backend.
//!
//! Two independent external collaborators live here:
//! - [`DataApiClient`]: official Data API v3, for video metadata
//! - [`TranscriptClient`]: unofficial InnerTube captions retrieval

pub mod data_api;
pub mod error;
pub mod transcript;

pub use data_api::{DataApiClient, VideoDetails};
pub use error::{TranscriptError, TranscriptResult, YoutubeError, YoutubeResult};
pub use transcript::TranscriptClient;

//! Application state.

use std::sync::Arc;

use tubeseo_store::{MemoryStore, VideoStore};
use tubeseo_youtube::{DataApiClient, TranscriptClient};

use crate::config::ApiConfig;
use crate::services::{OpenAiClient, Pipeline};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn VideoStore>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Create new application state. Clients are constructed once here and
    /// injected into the pipeline; tests assemble the same pieces by hand
    /// with mock endpoints.
    pub fn new(config: ApiConfig) -> Self {
        let store: Arc<dyn VideoStore> = Arc::new(MemoryStore::new());
        let youtube = Arc::new(DataApiClient::new(config.youtube_api_key.clone()));
        let transcripts = Arc::new(TranscriptClient::new());
        let generator = Arc::new(OpenAiClient::new(config.openai_api_key.clone()));

        let pipeline = Arc::new(Pipeline::new(
            Arc::clone(&store),
            youtube,
            transcripts,
            generator,
        ));

        Self {
            config,
            store,
            pipeline,
        }
    }
}

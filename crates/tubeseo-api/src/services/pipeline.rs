//! Video processing pipeline orchestrator.
//!
//! One invocation walks the stages below in order, persisting to the store
//! after every external call so partial progress survives a later failure:
//!
//! `Validating -> CacheCheck -> Created -> MetadataFetched ->
//! TranscriptResolved -> Generated`
//!
//! Transcript failure is the only non-fatal stage; it degrades to the
//! video's description (or title) as generation input. Every other failure
//! after record creation rolls the generated fields back to null before the
//! error is surfaced.

use std::fmt;
use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};

use tubeseo_models::{extract_video_id, RecordId, RecordPatch, VideoRecord};
use tubeseo_store::{StoreError, VideoStore};
use tubeseo_youtube::{DataApiClient, TranscriptClient, VideoDetails, YoutubeError};

use crate::services::openai::{GenerationError, OpenAiClient};

/// Stages of one pipeline invocation, logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    CacheCheck,
    Created,
    MetadataFetched,
    TranscriptResolved,
    Generated,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::CacheCheck => "cache_check",
            PipelineStage::Created => "created",
            PipelineStage::MetadataFetched => "metadata_fetched",
            PipelineStage::TranscriptResolved => "transcript_resolved",
            PipelineStage::Generated => "generated",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fatal pipeline failures, tagged so the HTTP layer can map each kind to a
/// status code without string matching.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No video ID could be extracted. Rejected before any record exists.
    #[error("Invalid YouTube URL format. Please provide a valid YouTube video URL.")]
    InvalidUrl,

    #[error("Video not found or is not publicly accessible")]
    VideoNotFound,

    #[error("Failed to fetch video data from YouTube API")]
    MetadataFetch(#[source] YoutubeError),

    /// The generator's JSON was missing a required field.
    #[error("Invalid response structure from OpenAI")]
    InvalidGenerationResponse,

    #[error("Failed to generate optimized content")]
    Generation(#[source] GenerationError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Orchestrates the URL-to-optimized-record pipeline.
///
/// All collaborators are injected once at construction; tests substitute
/// clients pointed at local mock servers.
pub struct Pipeline {
    store: Arc<dyn VideoStore>,
    youtube: Arc<DataApiClient>,
    transcripts: Arc<TranscriptClient>,
    generator: Arc<OpenAiClient>,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn VideoStore>,
        youtube: Arc<DataApiClient>,
        transcripts: Arc<TranscriptClient>,
        generator: Arc<OpenAiClient>,
    ) -> Self {
        Self {
            store,
            youtube,
            transcripts,
            generator,
        }
    }

    /// Process a source URL into a complete record.
    ///
    /// Complete records are served straight from the store without touching
    /// any upstream. Re-processing an incomplete record creates a fresh one;
    /// concurrent duplicate runs for the same URL are not coalesced.
    pub async fn process(&self, source_url: &str) -> Result<VideoRecord, PipelineError> {
        info!(stage = %PipelineStage::Validating, source_url, "Processing video");
        let video_id = extract_video_id(source_url).ok_or(PipelineError::InvalidUrl)?;

        info!(stage = %PipelineStage::CacheCheck, video_id, "Checking for existing record");
        if let Some(existing) = self.store.get_by_source_url(source_url).await? {
            if existing.is_complete() {
                counter!("tubeseo_pipeline_cache_hits_total").increment(1);
                info!(record_id = %existing.id, "Returning cached record");
                return Ok(existing);
            }
        }

        let record = self.store.create(source_url).await?;
        info!(stage = %PipelineStage::Created, record_id = %record.id, "Record created");

        match self.run_stages(&record.id, &video_id).await {
            Ok(completed) => {
                counter!("tubeseo_pipeline_runs_total", "outcome" => "success").increment(1);
                Ok(completed)
            }
            Err(err) => {
                counter!("tubeseo_pipeline_runs_total", "outcome" => "failure").increment(1);
                // Roll back the generation-stage fields so the record never
                // claims success. Metadata and transcript stay for
                // diagnostics.
                if let Err(cleanup_err) = self
                    .store
                    .update(&record.id, RecordPatch::clear_generated())
                    .await
                {
                    warn!(record_id = %record.id, error = %cleanup_err, "Cleanup update failed");
                }
                Err(err)
            }
        }
    }

    async fn run_stages(
        &self,
        record_id: &RecordId,
        video_id: &str,
    ) -> Result<VideoRecord, PipelineError> {
        let details = self.youtube.fetch_video(video_id).await.map_err(|e| match e {
            YoutubeError::VideoNotFound => PipelineError::VideoNotFound,
            other => PipelineError::MetadataFetch(other),
        })?;

        self.store
            .update(record_id, metadata_patch(&details))
            .await?;
        info!(stage = %PipelineStage::MetadataFetched, %record_id, "Metadata persisted");

        let transcript = match self.transcripts.fetch_transcript(video_id).await {
            Ok(text) => text,
            Err(err) => {
                // Non-fatal: generation proceeds on the description, or the
                // title when the description is empty.
                warn!(%record_id, error = %err, "Transcript extraction failed, using fallback text");
                counter!("tubeseo_pipeline_transcript_fallbacks_total").increment(1);
                if details.description.is_empty() {
                    details.title.clone()
                } else {
                    details.description.clone()
                }
            }
        };

        self.store
            .update(record_id, RecordPatch::with_transcript(transcript.clone()))
            .await?;
        info!(stage = %PipelineStage::TranscriptResolved, %record_id, "Transcript persisted");

        let content = self
            .generator
            .generate(&details.title, &details.description, &transcript)
            .await
            .map_err(|e| match e {
                GenerationError::InvalidResponse => PipelineError::InvalidGenerationResponse,
                other => PipelineError::Generation(other),
            })?;

        let completed = self
            .store
            .update(record_id, RecordPatch::generated(&content))
            .await?;
        info!(stage = %PipelineStage::Generated, %record_id, "Processing complete");

        Ok(completed)
    }
}

fn metadata_patch(details: &VideoDetails) -> RecordPatch {
    RecordPatch {
        platform_video_id: Some(details.platform_video_id.clone()),
        original_title: Some(details.title.clone()),
        original_description: Some(details.description.clone()),
        duration: Some(details.duration.clone()),
        view_count: Some(details.view_count.clone()),
        thumbnail_url: Some(details.thumbnail_url.clone()),
        ..RecordPatch::default()
    }
}

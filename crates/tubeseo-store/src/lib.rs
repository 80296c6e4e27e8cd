//! Video record store for the TubeSEO backend.
//!
//! Exposes the [`VideoStore`] trait consumed by the pipeline and the
//! in-memory implementation used in the current deployment. A durable
//! backend can be substituted behind the same trait.

pub mod error;
pub mod memory;

use async_trait::async_trait;

use tubeseo_models::{RecordId, RecordPatch, VideoRecord};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

/// Keyed store of video processing records.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Create a pending record for a source URL with a fresh unique ID.
    async fn create(&self, source_url: &str) -> StoreResult<VideoRecord>;

    /// Point lookup by primary key.
    async fn get(&self, id: &RecordId) -> StoreResult<Option<VideoRecord>>;

    /// First record whose source URL matches exactly. At most one complete
    /// record is expected per URL.
    async fn get_by_source_url(&self, source_url: &str) -> StoreResult<Option<VideoRecord>>;

    /// Merge a partial update into an existing record and return the result.
    /// Fails with [`StoreError::NotFound`] for an unknown ID.
    async fn update(&self, id: &RecordId, patch: RecordPatch) -> StoreResult<VideoRecord>;
}

//! In-memory video record store.

use std::collections::HashMap;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::RwLock;
use tracing::info;

use tubeseo_models::{RecordId, RecordPatch, VideoRecord};

use crate::error::{StoreError, StoreResult};
use crate::VideoStore;

/// Process-lifetime store backed by a `HashMap` behind an async `RwLock`.
///
/// Each call is atomic; overlapping pipeline runs for the same URL are not
/// otherwise synchronized. Records are never evicted.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, VideoRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held. Used by tests and diagnostics.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn create(&self, source_url: &str) -> StoreResult<VideoRecord> {
        let record = VideoRecord::new(source_url);
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());

        counter!("tubeseo_store_records_created_total").increment(1);
        info!(record_id = %record.id, "Created video record");
        Ok(record)
    }

    async fn get(&self, id: &RecordId) -> StoreResult<Option<VideoRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn get_by_source_url(&self, source_url: &str) -> StoreResult<Option<VideoRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|record| record.source_url == source_url)
            .cloned())
    }

    async fn update(&self, id: &RecordId, patch: RecordPatch) -> StoreResult<VideoRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;

        patch.apply(record);
        counter!("tubeseo_store_records_updated_total").increment(1);
        Ok(record.clone())
    }
}

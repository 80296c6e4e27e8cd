//! Video processing record models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a video processing record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a new random record ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One video processing record per distinct source URL.
///
/// A record is created in a pending state with only `source_url` populated,
/// then mutated in three ordered stages (metadata, transcript, generated
/// content) by the pipeline. A record is "complete" once `optimized_title`
/// is set; complete records are served from cache on re-processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Unique record ID, assigned at creation, immutable.
    pub id: RecordId,

    /// The submitted URL, immutable. Cache key for re-processing.
    pub source_url: String,

    /// Platform-native video ID, set after the metadata fetch.
    pub platform_video_id: Option<String>,

    /// Title reported by the hosting platform.
    pub original_title: Option<String>,

    /// Description reported by the hosting platform.
    pub original_description: Option<String>,

    /// ISO-8601 duration string as reported by the platform.
    pub duration: Option<String>,

    /// View count, string-encoded integer.
    pub view_count: Option<String>,

    /// Highest-resolution thumbnail URL available.
    pub thumbnail_url: Option<String>,

    /// Flattened transcript text, or the description/title fallback when
    /// caption extraction failed.
    pub transcript: Option<String>,

    /// Generated title. Presence marks the record as complete.
    pub optimized_title: Option<String>,

    /// Generated description.
    pub optimized_description: Option<String>,

    /// Generated keywords, comma-joined, at most 40 entries.
    pub keywords: Option<String>,

    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Create a new pending record for a source URL.
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            source_url: source_url.into(),
            platform_video_id: None,
            original_title: None,
            original_description: None,
            duration: None,
            view_count: None,
            thumbnail_url: None,
            transcript: None,
            optimized_title: None,
            optimized_description: None,
            keywords: None,
            created_at: Utc::now(),
        }
    }

    /// A record is complete once the generation stage has persisted a title.
    pub fn is_complete(&self) -> bool {
        self.optimized_title.is_some()
    }
}

/// Content produced by the generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedContent {
    pub title: String,
    pub description: String,
    /// Comma-joined keyword list, already normalized.
    pub keywords: String,
}

/// Partial update for a [`VideoRecord`].
///
/// Plain `Option` fields are merged when `Some`. The three generation-stage
/// fields are doubly wrapped so a patch can distinguish "leave untouched"
/// (`None`) from "set to null" (`Some(None)`); clearing all three together
/// is how a failed run is rolled back.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub platform_video_id: Option<String>,
    pub original_title: Option<String>,
    pub original_description: Option<String>,
    pub duration: Option<String>,
    pub view_count: Option<String>,
    pub thumbnail_url: Option<String>,
    pub transcript: Option<String>,
    pub optimized_title: Option<Option<String>>,
    pub optimized_description: Option<Option<String>>,
    pub keywords: Option<Option<String>>,
}

impl RecordPatch {
    /// Patch that persists the three generated fields.
    pub fn generated(content: &OptimizedContent) -> Self {
        Self {
            optimized_title: Some(Some(content.title.clone())),
            optimized_description: Some(Some(content.description.clone())),
            keywords: Some(Some(content.keywords.clone())),
            ..Self::default()
        }
    }

    /// Patch that rolls the generated fields back to null.
    ///
    /// Metadata and transcript fields are deliberately left intact; partial
    /// state from earlier stages stays useful for diagnostics and
    /// reprocessing.
    pub fn clear_generated() -> Self {
        Self {
            optimized_title: Some(None),
            optimized_description: Some(None),
            keywords: Some(None),
            ..Self::default()
        }
    }

    /// Patch that persists the resolved transcript text.
    pub fn with_transcript(text: impl Into<String>) -> Self {
        Self {
            transcript: Some(text.into()),
            ..Self::default()
        }
    }

    /// Merge this patch into a record.
    pub fn apply(self, record: &mut VideoRecord) {
        if let Some(v) = self.platform_video_id {
            record.platform_video_id = Some(v);
        }
        if let Some(v) = self.original_title {
            record.original_title = Some(v);
        }
        if let Some(v) = self.original_description {
            record.original_description = Some(v);
        }
        if let Some(v) = self.duration {
            record.duration = Some(v);
        }
        if let Some(v) = self.view_count {
            record.view_count = Some(v);
        }
        if let Some(v) = self.thumbnail_url {
            record.thumbnail_url = Some(v);
        }
        if let Some(v) = self.transcript {
            record.transcript = Some(v);
        }
        if let Some(v) = self.optimized_title {
            record.optimized_title = v;
        }
        if let Some(v) = self.optimized_description {
            record.optimized_description = v;
        }
        if let Some(v) = self.keywords {
            record.keywords = v;
        }
    }
}

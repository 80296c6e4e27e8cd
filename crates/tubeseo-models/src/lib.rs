//! Shared data models for the TubeSEO backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video processing records and partial updates
//! - Optimized content produced by the generation stage
//! - YouTube URL parsing and validation utilities

pub mod record;
pub mod utils;

// Re-export common types
pub use record::{OptimizedContent, RecordId, RecordPatch, VideoRecord};
pub use utils::{extract_video_id, is_allowed_source_url};

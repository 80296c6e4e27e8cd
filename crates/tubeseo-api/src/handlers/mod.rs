//! HTTP request handlers.

pub mod health;
pub mod videos;

pub use health::health;
pub use videos::{get_video, process_video, ProcessVideoRequest};

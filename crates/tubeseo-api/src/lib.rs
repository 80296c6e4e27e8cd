//! Axum HTTP API server for TubeSEO.
//!
//! This crate provides:
//! - The video processing pipeline and content generation services
//! - The REST API surface (`POST /api/videos/process`, `GET /api/videos/:id`)
//! - Prometheus metrics and request logging

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{OpenAiClient, Pipeline, PipelineError};
pub use state::AppState;

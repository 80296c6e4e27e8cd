//! Business logic services.

pub mod openai;
pub mod pipeline;

pub use openai::{GenerationError, OpenAiClient};
pub use pipeline::{Pipeline, PipelineError, PipelineStage};

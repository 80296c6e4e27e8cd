//! OpenAI client for generating optimized video metadata.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use tubeseo_models::OptimizedContent;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.7;

/// Transcript text beyond this many characters is cut from the prompt.
const TRANSCRIPT_PROMPT_CHARS: usize = 4000;

/// Keyword lists are capped at this many entries.
const MAX_KEYWORDS: usize = 40;

const SYSTEM_PROMPT: &str = "You are a professional YouTube SEO specialist. \
    Generate optimized video metadata that maximizes discoverability and \
    engagement while maintaining accuracy to the video content.";

/// Errors from the content generation stage.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    /// The model's JSON was missing one of the three required fields.
    #[error("Invalid response structure from OpenAI")]
    InvalidResponse,

    #[error("OpenAI API request failed: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// The structured object the model is instructed to return.
#[derive(Debug, Deserialize)]
struct RawGenerated {
    title: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
}

impl OpenAiClient {
    /// Create a client against the production API. A missing key is allowed
    /// here and surfaces as an error on first use.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests).
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Generate an optimized title, description, and keyword set.
    pub async fn generate(
        &self,
        original_title: &str,
        original_description: &str,
        transcript: &str,
    ) -> Result<OptimizedContent, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(original_title, original_description, transcript),
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(format!("{}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Api(format!("unreadable response: {}", e)))?;

        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or(GenerationError::InvalidResponse)?;

        let raw: RawGenerated = serde_json::from_str(strip_code_fences(content))
            .map_err(|_| GenerationError::InvalidResponse)?;

        let (Some(title), Some(description), Some(keywords)) =
            (raw.title, raw.description, raw.keywords)
        else {
            return Err(GenerationError::InvalidResponse);
        };
        if title.is_empty() || description.is_empty() || keywords.is_empty() {
            return Err(GenerationError::InvalidResponse);
        }

        info!(title_len = title.len(), "Generated optimized content");

        Ok(OptimizedContent {
            title,
            description,
            keywords: normalize_keywords(&keywords),
        })
    }
}

/// Build the user prompt from the original metadata and transcript text.
fn build_prompt(title: &str, description: &str, transcript: &str) -> String {
    let truncated = transcript.chars().count() > TRANSCRIPT_PROMPT_CHARS;
    let excerpt: String = transcript.chars().take(TRANSCRIPT_PROMPT_CHARS).collect();
    let excerpt = if truncated {
        format!("{} ...", excerpt)
    } else {
        excerpt
    };

    format!(
        r#"You are a YouTube SEO expert. Based on the following video content, generate optimized YouTube metadata:

Original Title: {title}
Original Description: {description}
Video Transcript: {excerpt}

Please generate:
1. An optimized title (60-70 characters) that is SEO-friendly and engaging
2. A comprehensive description (200-500 words) that includes key points from the video
3. Exactly 40 relevant keywords (comma-separated, no hashtags) for maximum discoverability

Respond with JSON in this exact format:
{{
  "title": "optimized title here",
  "description": "comprehensive description here",
  "keywords": "keyword1, keyword2, keyword3, ..."
}}"#
    )
}

/// Models occasionally wrap JSON in markdown fences despite the structured
/// response request.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Split a raw keyword string on commas, trim each entry, drop hashtag
/// markers and empties, and cap the list at [`MAX_KEYWORDS`].
fn normalize_keywords(raw: &str) -> String {
    raw.split(',')
        .map(|keyword| keyword.trim().trim_start_matches('#').trim())
        .filter(|keyword| !keyword.is_empty())
        .take(MAX_KEYWORDS)
        .collect::<Vec<_>>()
        .join(", ")
}

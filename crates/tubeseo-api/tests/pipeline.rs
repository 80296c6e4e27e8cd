//! End-to-end pipeline tests against mocked upstream services.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tubeseo_api::services::{OpenAiClient, Pipeline};
use tubeseo_api::PipelineError;
use tubeseo_store::{MemoryStore, VideoStore};
use tubeseo_youtube::{DataApiClient, TranscriptClient};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

struct Harness {
    youtube: MockServer,
    captions: MockServer,
    openai: MockServer,
    store: Arc<MemoryStore>,
    pipeline: Pipeline,
}

async fn harness() -> Harness {
    let youtube = MockServer::start().await;
    let captions = MockServer::start().await;
    let openai = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());

    let pipeline = Pipeline::new(
        Arc::clone(&store) as Arc<dyn VideoStore>,
        Arc::new(DataApiClient::with_base_url(
            Some("test-key".to_string()),
            youtube.uri(),
        )),
        Arc::new(TranscriptClient::with_base_url(captions.uri())),
        Arc::new(OpenAiClient::with_base_url(
            Some("sk-test".to_string()),
            openai.uri(),
        )),
    );

    Harness {
        youtube,
        captions,
        openai,
        store,
        pipeline,
    }
}

async fn mount_metadata(server: &MockServer, description: &str, expect: Option<u64>) {
    let mut mock = Mock::given(method("GET")).and(path("/videos")).respond_with(
        ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "snippet": {
                    "title": "Original Title",
                    "description": description,
                    "thumbnails": { "high": { "url": "https://img.example/high.jpg" } }
                },
                "statistics": { "viewCount": "4200" },
                "contentDetails": { "duration": "PT10M1S" }
            }]
        })),
    );
    if let Some(n) = expect {
        mock = mock.expect(n);
    }
    mock.mount(server).await;
}

async fn mount_transcript(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        { "baseUrl": format!("{}/api/timedtext?lang=en", server.uri()) }
                    ]
                }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [
                { "segs": [{ "utf8": "hello and welcome" }] },
                { "segs": [{ "utf8": "to this video" }] }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_transcript_unavailable(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playabilityStatus": { "status": "OK" }
        })))
        .mount(server)
        .await;
}

async fn mount_generation(server: &MockServer, keywords: &str) {
    let content = json!({
        "title": "Optimized Title",
        "description": "An optimized description of the video.",
        "keywords": keywords
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "content": serde_json::to_string(&content).unwrap() }
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_completes_record() {
    let h = harness().await;
    mount_metadata(&h.youtube, "A description.", None).await;
    mount_transcript(&h.captions).await;
    mount_generation(&h.openai, "rust, tutorials, seo").await;

    let record = h.pipeline.process(WATCH_URL).await.unwrap();

    assert!(record.is_complete());
    assert_eq!(record.source_url, WATCH_URL);
    assert_eq!(record.platform_video_id.as_deref(), Some("dQw4w9WgXcQ"));
    assert_eq!(record.original_title.as_deref(), Some("Original Title"));
    assert_eq!(record.original_description.as_deref(), Some("A description."));
    assert_eq!(record.duration.as_deref(), Some("PT10M1S"));
    assert_eq!(record.view_count.as_deref(), Some("4200"));
    assert_eq!(
        record.thumbnail_url.as_deref(),
        Some("https://img.example/high.jpg")
    );
    assert_eq!(
        record.transcript.as_deref(),
        Some("hello and welcome to this video")
    );
    assert_eq!(record.optimized_title.as_deref(), Some("Optimized Title"));
    assert_eq!(record.keywords.as_deref(), Some("rust, tutorials, seo"));

    // The store holds the same completed record
    let stored = h.store.get(&record.id).await.unwrap().unwrap();
    assert!(stored.is_complete());
}

#[tokio::test]
async fn test_complete_record_is_served_from_cache() {
    let h = harness().await;
    // Each upstream may be called exactly once across both invocations
    mount_metadata(&h.youtube, "A description.", Some(1)).await;
    mount_transcript(&h.captions).await;
    mount_generation(&h.openai, "rust, tutorials, seo").await;

    let first = h.pipeline.process(WATCH_URL).await.unwrap();
    let second = h.pipeline.process(WATCH_URL).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn test_transcript_failure_falls_back_to_description() {
    let h = harness().await;
    mount_metadata(&h.youtube, "A description.", None).await;
    mount_transcript_unavailable(&h.captions).await;
    mount_generation(&h.openai, "rust, tutorials, seo").await;

    let record = h.pipeline.process(WATCH_URL).await.unwrap();

    assert!(record.is_complete());
    assert_eq!(record.transcript.as_deref(), Some("A description."));
}

#[tokio::test]
async fn test_transcript_failure_falls_back_to_title_when_description_empty() {
    let h = harness().await;
    mount_metadata(&h.youtube, "", None).await;
    mount_transcript_unavailable(&h.captions).await;
    mount_generation(&h.openai, "rust, tutorials, seo").await;

    let record = h.pipeline.process(WATCH_URL).await.unwrap();

    assert_eq!(record.transcript.as_deref(), Some("Original Title"));
}

#[tokio::test]
async fn test_generation_failure_clears_generated_fields() {
    let h = harness().await;
    mount_metadata(&h.youtube, "A description.", None).await;
    mount_transcript(&h.captions).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&h.openai)
        .await;

    let err = h.pipeline.process(WATCH_URL).await.unwrap_err();
    assert!(matches!(err, PipelineError::Generation(_)));

    // Earlier stages stay persisted, generated fields are null
    let stored = h
        .store
        .get_by_source_url(WATCH_URL)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_complete());
    assert!(stored.optimized_title.is_none());
    assert!(stored.optimized_description.is_none());
    assert!(stored.keywords.is_none());
    assert_eq!(stored.original_title.as_deref(), Some("Original Title"));
    assert_eq!(
        stored.transcript.as_deref(),
        Some("hello and welcome to this video")
    );
}

#[tokio::test]
async fn test_keywords_are_capped_at_forty() {
    let h = harness().await;
    mount_metadata(&h.youtube, "A description.", None).await;
    mount_transcript(&h.captions).await;
    let keywords = (1..=45)
        .map(|i| format!("keyword{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    mount_generation(&h.openai, &keywords).await;

    let record = h.pipeline.process(WATCH_URL).await.unwrap();

    let stored_keywords: Vec<&str> = record.keywords.as_deref().unwrap().split(", ").collect();
    assert_eq!(stored_keywords.len(), 40);
    assert_eq!(stored_keywords[0], "keyword1");
    assert_eq!(stored_keywords[39], "keyword40");
    assert!(stored_keywords.iter().all(|k| !k.starts_with('#')));
}

#[tokio::test]
async fn test_invalid_url_creates_no_record() {
    let h = harness().await;

    let err = h.pipeline.process("https://example.com/video").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidUrl));
    assert_eq!(h.store.len().await, 0);
}

#[tokio::test]
async fn test_missing_video_is_fatal() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&h.youtube)
        .await;

    let err = h.pipeline.process(WATCH_URL).await.unwrap_err();
    assert!(matches!(err, PipelineError::VideoNotFound));

    // The pending record exists but never claims success
    let stored = h
        .store
        .get_by_source_url(WATCH_URL)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_complete());
    assert!(stored.original_title.is_none());
}

#[tokio::test]
async fn test_incomplete_record_is_reprocessed() {
    let h = harness().await;
    mount_metadata(&h.youtube, "A description.", None).await;
    mount_transcript(&h.captions).await;

    // First run fails at generation, leaving an incomplete record
    let failing = Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1);
    let guard = h.openai.register_as_scoped(failing).await;
    assert!(h.pipeline.process(WATCH_URL).await.is_err());
    drop(guard);

    // Second run goes back upstream instead of serving the failed record
    mount_generation(&h.openai, "rust, tutorials, seo").await;
    let record = h.pipeline.process(WATCH_URL).await.unwrap();
    assert!(record.is_complete());
}

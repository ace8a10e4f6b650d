use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use postwright::app::PostGenerationService;
use postwright::domain::{GenerationError, PostRequest};
use postwright::infra::llm::{GeminiBackend, TextGenerationBackend};
use serde_json::json;

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";
const MODELS_PATH: &str = "/v1beta/models";

fn service_for(server: &ServerGuard) -> PostGenerationService {
    let backend = GeminiBackend::with_config(server.url(), Some(Duration::from_secs(2)))
        .expect("backend should build");
    PostGenerationService::new(Arc::new(backend) as Arc<dyn TextGenerationBackend>)
}

fn key_query() -> Matcher {
    Matcher::UrlEncoded("key".to_string(), "test-key".to_string())
}

fn generation_body(text: &str) -> String {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
    .to_string()
}

fn listing_body() -> String {
    json!({
        "models": [
            { "name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"] },
            { "name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent", "countTokens"] },
            { "name": "models/gemini-2.0-flash", "supportedGenerationMethods": ["generateContent"] }
        ]
    })
    .to_string()
}

#[test]
fn generate_returns_first_candidate_text_verbatim() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .match_header(
            "content-type",
            Matcher::Regex("application/json.*".to_string()),
        )
        .match_body(Matcher::Regex("Wireless Earbuds X1".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(generation_body("  ✨ 家人們 the raw post text\n  "))
        .create();

    let service = service_for(&server);
    let result = service
        .generate(&PostRequest::new(
            "Wireless Earbuds X1, 30h battery",
            "test-key",
        ))
        .expect("mocked generation should succeed");

    mock.assert();
    assert_eq!(result, "  ✨ 家人們 the raw post text\n  ");
}

#[test]
fn success_status_with_zero_candidates_fails_with_no_content_generated() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[]}"#)
        .create();

    let service = service_for(&server);
    let error = service
        .generate(&PostRequest::new("some product", "test-key"))
        .expect_err("empty candidate list should fail");

    mock.assert();
    assert!(matches!(error, GenerationError::NoContentGenerated));
}

#[test]
fn not_found_discovers_fallback_and_retries_with_fast_tier_model() {
    let mut server = Server::new();
    let primary = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"models/gemini-1.5-flash is not found for API version v1beta"}}"#)
        .create();
    let listing = server
        .mock("GET", MODELS_PATH)
        .match_query(key_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_body())
        .create();
    let retry = server
        .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
        .match_query(key_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(generation_body("post from the fallback model"))
        .create();

    let service = service_for(&server);
    let result = service
        .generate(&PostRequest::new("some product", "test-key"))
        .expect("fallback retry should succeed");

    primary.assert();
    listing.assert();
    retry.assert();
    assert_eq!(result, "post from the fallback model");
}

#[test]
fn not_found_with_no_viable_models_fails_with_no_models_available() {
    let mut server = Server::new();
    let primary = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"not found"}}"#)
        .create();
    let listing = server
        .mock("GET", MODELS_PATH)
        .match_query(key_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"models":[{"name":"models/text-embedding-004","supportedGenerationMethods":["embedContent"]}]}"#,
        )
        .create();

    let service = service_for(&server);
    let error = service
        .generate(&PostRequest::new("some product", "test-key"))
        .expect_err("no viable fallback should fail");

    primary.assert();
    listing.assert();
    assert!(matches!(error, GenerationError::NoModelsAvailable));
}

#[test]
fn not_found_with_failing_listing_fails_with_no_models_available() {
    let mut server = Server::new();
    let primary = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"not found"}}"#)
        .create();
    let listing = server
        .mock("GET", MODELS_PATH)
        .match_query(key_query())
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"permission denied"}}"#)
        .create();

    let service = service_for(&server);
    let error = service
        .generate(&PostRequest::new("some product", "test-key"))
        .expect_err("failed listing should fail");

    primary.assert();
    listing.assert();
    assert!(matches!(error, GenerationError::NoModelsAvailable));
}

#[test]
fn non_not_found_failure_passes_provider_message_through_verbatim() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Invalid argument"}}"#)
        .create();

    let service = service_for(&server);
    let error = service
        .generate(&PostRequest::new("some product", "test-key"))
        .expect_err("bad request should fail");

    mock.assert();
    assert!(matches!(
        error,
        GenerationError::Provider { message } if message == "Invalid argument"
    ));
}

#[test]
fn non_not_found_failure_without_body_embeds_http_status() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(500)
        .create();

    let service = service_for(&server);
    let error = service
        .generate(&PostRequest::new("some product", "test-key"))
        .expect_err("server error should fail");

    mock.assert();
    assert!(matches!(
        error,
        GenerationError::Provider { message } if message.contains("500")
    ));
}

#[test]
fn sequential_calls_reissue_network_requests() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(key_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(generation_body("same post"))
        .expect(2)
        .create();

    let service = service_for(&server);
    let request = PostRequest::new("some product", "test-key");

    let first = service.generate(&request).expect("first call should succeed");
    let second = service
        .generate(&request)
        .expect("second call should succeed");

    mock.assert();
    assert_eq!(first, "same post");
    assert_eq!(second, "same post");
}

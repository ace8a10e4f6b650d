use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{GenerationError, ModelDescriptor};

use super::backend::{GENERATE_TEXT_METHOD, TextGenerationBackend};
use super::env::{ConfigError, read_env_var, read_timeout_from_env};
use super::response_parsing::truncate_message;

const BACKEND_ID: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION_PATH: &str = "v1beta";

const ENV_BASE_URL: &str = "POSTWRIGHT_GEMINI_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "POSTWRIGHT_GEMINI_TIMEOUT_SECS";

pub struct GeminiBackend {
    api_base_url: String,
    client: Client,
}

impl GeminiBackend {
    /// Production endpoint, transport-default timeout.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(DEFAULT_BASE_URL, None)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url =
            read_env_var(ENV_BASE_URL)?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = read_timeout_from_env(ENV_TIMEOUT_SECS)?;
        Self::with_config(api_base_url, timeout)
    }

    /// `timeout: None` leaves the transport default in place; no request
    /// deadline of its own is enforced.
    pub fn with_config(
        api_base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "api_base_url",
                "must not be empty",
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| ConfigError::HttpClient {
            reason: err.to_string(),
        })?;

        Ok(Self {
            api_base_url,
            client,
        })
    }

    fn generate_endpoint_url(&self, model: &str) -> String {
        format!(
            "{}/{API_VERSION_PATH}/models/{model}:{GENERATE_TEXT_METHOD}",
            self.api_base_url.trim_end_matches('/')
        )
    }

    fn models_endpoint_url(&self) -> String {
        format!(
            "{}/{API_VERSION_PATH}/models",
            self.api_base_url.trim_end_matches('/')
        )
    }
}

impl TextGenerationBackend for GeminiBackend {
    fn backend_id(&self) -> &str {
        BACKEND_ID
    }

    fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        api_key: &str,
    ) -> Result<String, GenerationError> {
        let payload = GenerateContentRequest {
            contents: vec![ContentEnvelope {
                parts: vec![ContentPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.generate_endpoint_url(model))
            .query(&[("key", api_key)])
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let response_body = response.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_generate_http_error(model, status, &response_body));
        }

        extract_generated_text(&response_body)
    }

    fn list_models(&self, api_key: &str) -> Result<Vec<ModelDescriptor>, GenerationError> {
        let response = self
            .client
            .get(self.models_endpoint_url())
            .query(&[("key", api_key)])
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let response_body = response.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_list_http_error(status, &response_body));
        }

        let decoded: ListModelsResponse = serde_json::from_str(&response_body).map_err(|err| {
            GenerationError::provider(format!("models response decode failed: {err}"))
        })?;

        Ok(decoded
            .models
            .into_iter()
            .map(|entry| ModelDescriptor {
                name: entry.name,
                supported_methods: entry.supported_generation_methods,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<ContentEnvelope>,
}

#[derive(Debug, Serialize)]
struct ContentEnvelope {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
    #[serde(default, rename = "supportedGenerationMethods")]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    #[serde(default)]
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

/// First candidate, first content part, text verbatim.
fn extract_generated_text(response_body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(response_body).map_err(|err| {
        GenerationError::provider(format!("generation response decode failed: {err}"))
    })?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::NoContentGenerated)?;
    let content = candidate
        .content
        .ok_or(GenerationError::NoContentGenerated)?;
    let part = content
        .parts
        .into_iter()
        .next()
        .ok_or(GenerationError::NoContentGenerated)?;

    part.text.ok_or(GenerationError::NoContentGenerated)
}

fn map_generate_http_error(model: &str, status: StatusCode, body: &str) -> GenerationError {
    if status == StatusCode::NOT_FOUND {
        return GenerationError::model_not_found(model);
    }
    GenerationError::provider(provider_error_message(status, body))
}

fn map_list_http_error(status: StatusCode, body: &str) -> GenerationError {
    GenerationError::provider(provider_error_message(status, body))
}

fn provider_error_message(status: StatusCode, body: &str) -> String {
    let parsed_message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|detail| detail.message)
        .filter(|message| !message.trim().is_empty());

    match parsed_message {
        Some(message) => message,
        None => {
            let body = truncate_message(body);
            if body.is_empty() {
                format!("API error: HTTP {status}")
            } else {
                format!("API error: HTTP {status}: {body}")
            }
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> GenerationError {
    GenerationError::network(error.to_string())
}

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{GenerationError, ModelDescriptor, PostRequest};
use crate::infra::llm::env::read_env_var;
use crate::infra::llm::{
    ConfigError, GENERATE_TEXT_METHOD, PromptBuilder, PromptStyle, TextGenerationBackend,
};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// Tier markers are a naming heuristic, not a provider contract; listing
// order breaks ties when neither marker matches.
const MODEL_FAMILY_MARKER: &str = "gemini";
const FAST_TIER_MARKER: &str = "flash";
const GENERAL_TIER_MARKER: &str = "pro";

const ENV_DEFAULT_MODEL: &str = "POSTWRIGHT_GEMINI_MODEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostServiceConfig {
    pub default_model: String,
    pub style: PromptStyle,
}

impl Default for PostServiceConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            style: PromptStyle::default(),
        }
    }
}

#[derive(Clone)]
pub struct PostGenerationService {
    backend: Arc<dyn TextGenerationBackend>,
    prompt_builder: PromptBuilder,
    default_model: String,
}

impl PostGenerationService {
    pub fn new(backend: Arc<dyn TextGenerationBackend>) -> Self {
        Self::with_config(backend, PostServiceConfig::default())
    }

    pub fn with_config(backend: Arc<dyn TextGenerationBackend>, config: PostServiceConfig) -> Self {
        Self {
            backend,
            prompt_builder: PromptBuilder::new(config.style),
            default_model: config.default_model,
        }
    }

    pub fn from_env(backend: Arc<dyn TextGenerationBackend>) -> Result<Self, ConfigError> {
        let default_model = match read_env_var(ENV_DEFAULT_MODEL)? {
            Some(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ConfigError::invalid_value(
                        ENV_DEFAULT_MODEL,
                        "must not be empty",
                    ));
                }
                trimmed.to_string()
            }
            None => DEFAULT_MODEL.to_string(),
        };

        Ok(Self::with_config(
            backend,
            PostServiceConfig {
                default_model,
                style: PromptStyle::default(),
            },
        ))
    }

    pub fn generate(&self, request: &PostRequest) -> Result<String, GenerationError> {
        if request.content.is_empty() {
            return Ok(String::new());
        }
        request.validate_credential()?;

        let prompt = self.prompt_builder.build(&request.content);
        let model = request.model.as_deref().unwrap_or(&self.default_model);

        match self.backend.generate_text(model, &prompt, &request.api_key) {
            Err(error) if error.triggers_model_fallback() => {
                warn!(
                    backend = self.backend.backend_id(),
                    model, "configured model rejected, discovering a fallback"
                );
                let fallback = self.discover_fallback_model(&request.api_key)?;
                debug!(model = fallback.as_str(), "retrying with fallback model");
                self.backend
                    .generate_text(&fallback, &prompt, &request.api_key)
            }
            outcome => outcome,
        }
    }

    pub fn generate_post(
        &self,
        content: &str,
        api_key: &str,
    ) -> Result<String, GenerationError> {
        self.generate(&PostRequest::new(content, api_key))
    }

    fn discover_fallback_model(&self, api_key: &str) -> Result<String, GenerationError> {
        let descriptors = match self.backend.list_models(api_key) {
            Ok(descriptors) => descriptors,
            Err(error) => {
                warn!(%error, "model listing failed during fallback discovery");
                return Err(GenerationError::NoModelsAvailable);
            }
        };

        select_fallback_model(&descriptors).ok_or(GenerationError::NoModelsAvailable)
    }
}

fn select_fallback_model(descriptors: &[ModelDescriptor]) -> Option<String> {
    let viable = descriptors
        .iter()
        .filter(|descriptor| {
            descriptor.name.contains(MODEL_FAMILY_MARKER)
                && descriptor.supports(GENERATE_TEXT_METHOD)
        })
        .map(ModelDescriptor::short_id)
        .collect::<Vec<_>>();

    viable
        .iter()
        .find(|id| id.contains(FAST_TIER_MARKER))
        .or_else(|| viable.iter().find(|id| id.contains(GENERAL_TIER_MARKER)))
        .or_else(|| viable.first())
        .map(|id| (*id).to_string())
}

use super::GenerationError;

/// One user-initiated generation request. Consumed by a single call; never
/// stored or reused across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub content: String,
    pub api_key: String,
    /// Model identifier override. `None` uses the service default.
    pub model: Option<String>,
}

impl PostRequest {
    pub fn new(content: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            api_key: api_key.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate_credential(&self) -> Result<(), GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingKey);
        }
        Ok(())
    }
}

/// A model advertised by the provider's listing endpoint. Produced only
/// during fallback discovery and discarded after selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Provider-qualified name, e.g. `models/gemini-1.5-flash`.
    pub name: String,
    pub supported_methods: Vec<String>,
}

impl ModelDescriptor {
    /// The bare model identifier, with the provider-qualified prefix removed.
    pub fn short_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn supports(&self, method: &str) -> bool {
        self.supported_methods.iter().any(|entry| entry == method)
    }
}

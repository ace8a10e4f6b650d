use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorCategory {
    UserActionRequired,
    ModelUnavailable,
    ProviderFailure,
    TransportFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("API key is required")]
    MissingKey,
    #[error("model '{model}' was not found for this API key")]
    ModelNotFound { model: String },
    #[error("no usable generation model is available for this API key")]
    NoModelsAvailable,
    #[error("no content was generated for this request")]
    NoContentGenerated,
    #[error("provider request failed: {message}")]
    Provider { message: String },
    #[error("network transport failed: {message}")]
    Network { message: String },
}

impl GenerationError {
    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn category(&self) -> GenerationErrorCategory {
        match self {
            Self::MissingKey => GenerationErrorCategory::UserActionRequired,
            Self::ModelNotFound { .. } | Self::NoModelsAvailable => {
                GenerationErrorCategory::ModelUnavailable
            }
            Self::NoContentGenerated | Self::Provider { .. } => {
                GenerationErrorCategory::ProviderFailure
            }
            Self::Network { .. } => GenerationErrorCategory::TransportFailure,
        }
    }

    /// Whether this failure should trigger the one-shot fallback-model
    /// discovery instead of surfacing immediately.
    pub fn triggers_model_fallback(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::MissingKey => {
                "An API key is required. Enter your provider API key and try again.".to_string()
            }
            Self::ModelNotFound { model } => {
                format!("The model '{model}' is not available for this API key.")
            }
            Self::NoModelsAvailable => {
                "The API key appears valid, but no usable generation model was found. Check the project permissions for this key."
                    .to_string()
            }
            Self::NoContentGenerated => {
                "The provider returned an empty generation. Try again with different content."
                    .to_string()
            }
            Self::Provider { message } => {
                format!("The provider rejected the request: {message}")
            }
            Self::Network { message } => {
                format!("Could not reach the generation service: {message}")
            }
        }
    }
}

use crate::domain::{GenerationError, ModelDescriptor};

/// Operation name a listed model must support for `generate_text` to be
/// usable against it. Descriptors report methods in the provider's naming.
pub const GENERATE_TEXT_METHOD: &str = "generateContent";

pub trait TextGenerationBackend: Send + Sync {
    fn backend_id(&self) -> &str;

    fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        api_key: &str,
    ) -> Result<String, GenerationError>;

    fn list_models(&self, api_key: &str) -> Result<Vec<ModelDescriptor>, GenerationError>;
}

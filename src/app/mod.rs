mod post_service;

pub use post_service::{DEFAULT_MODEL, PostGenerationService, PostServiceConfig};

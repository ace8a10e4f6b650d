mod errors;
mod post_contract;

pub use errors::{GenerationError, GenerationErrorCategory};
pub use post_contract::{ModelDescriptor, PostRequest};

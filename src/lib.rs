//! Turns raw product text into a provider-generated social post via a
//! generative-language REST API, with one-shot fallback model discovery.

pub mod app;
pub mod domain;
pub mod infra;

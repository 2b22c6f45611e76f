//! LLM (Large Language Model) integration module
//!
//! The remote text-generation service sits behind [`TextModel`] so the
//! podcast operations can run against Gemini or a scripted stand-in.

pub mod fallback;
pub mod gemini;
pub mod schema;

pub use fallback::{first_success, strip_fences};
pub use gemini::GeminiModel;
pub use schema::{Schema, SchemaType};

use crate::config::GeminiConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A hosted text-generation service
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate text from `prompt` with the named model.
    ///
    /// With a schema the service is asked for JSON matching it; without one
    /// the output is free text.
    async fn generate(&self, model: &str, prompt: &str, schema: Option<&Schema>) -> Result<String>;

    /// Get backend name
    fn name(&self) -> &'static str;
}

/// Create the Gemini backend from configuration
pub fn create_model(config: &GeminiConfig) -> Result<Arc<dyn TextModel>> {
    Ok(Arc::new(GeminiModel::new(config)?))
}

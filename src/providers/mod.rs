mod anthropic;
mod factory;
mod ollama;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;

use crate::error::CrawlError;
use async_trait::async_trait;

/// Unified trait for all completion back-ends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Send one prompt and return the model's text answer
    async fn complete(&self, prompt: &str) -> Result<String, CrawlError>;
}

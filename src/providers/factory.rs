use crate::config::{CrawlerConfig, ProviderConfig};
use crate::error::CrawlError;
use crate::providers::{AnthropicProvider, LlmProvider, OllamaProvider, OpenAIProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, CrawlError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(CrawlError::Provider(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config)?)),
            "ollama" => Ok(Box::new(OllamaProvider::new(config)?)),
            _ => Err(CrawlError::Provider(format!(
                "Unknown provider: {} (available: {})",
                provider_name,
                Self::available_providers().join(", ")
            ))),
        }
    }

    /// Get the default provider from configuration
    ///
    /// A provider without a configuration section is created with default
    /// settings, so the usual API key environment variables are enough.
    pub fn get_default_provider(config: &CrawlerConfig) -> Result<Box<dyn LlmProvider>, CrawlError> {
        let provider_name = &config.default_provider;
        match config.providers.get(provider_name) {
            Some(provider_config) => Self::create(provider_name, provider_config),
            None => Self::create(provider_name, &ProviderConfig::default()),
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "anthropic", "ollama"]
    }
}

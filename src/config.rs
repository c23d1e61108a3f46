use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main crawler configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct CrawlerConfig {
    /// Completion provider used for extraction
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Crawl behaviour and output location
    #[serde(default)]
    pub crawl: CrawlConfig,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            crawl: CrawlConfig::default(),
        }
    }
}

/// Configuration for a specific completion provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier; each provider has its own default
    pub model: Option<String>,
    /// Temperature for generation, provider default when absent
    pub temperature: Option<f32>,
    /// Maximum tokens to generate, provider default when absent
    pub max_tokens: Option<u32>,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: None,
            temperature: None,
            max_tokens: None,
            api_key: None,
            base_url: None,
        }
    }
}

/// Crawl behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// Directory receiving one JSON document per recipe
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Drain the frontier after every operator input
    #[serde(default = "default_auto")]
    pub auto: bool,
    /// Stop a drain after this many pages; unbounded when absent
    #[serde(default)]
    pub max_pages: Option<usize>,
    /// HTTP timeout for page fetches in seconds; transport default when absent
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Language every extracted recipe is translated to
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            auto: default_auto(),
            max_pages: None,
            timeout: None,
            language: default_language(),
        }
    }
}

impl CrawlConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("db/recipes_raw")
}

fn default_auto() -> bool {
    true
}

fn default_language() -> String {
    "english".to_string()
}

impl CrawlerConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_CRAWLER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_CRAWLER__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`CrawlerConfig::load`] for the source priority.
pub fn load_config() -> Result<CrawlerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_CRAWLER__CRAWL__OUTPUT_DIR
        .add_source(
            Environment::with_prefix("RECIPE_CRAWLER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

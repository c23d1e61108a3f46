pub mod canonical;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod flatten;
pub mod model;
pub mod operator;
pub mod providers;
pub mod store;

pub use canonical::canonicalize;
pub use config::CrawlerConfig;
pub use crawler::{CrawlSummary, Crawler, CrawlerState, StepOutcome};
pub use error::CrawlError;
pub use extractor::RecipeExtractor;
pub use fetcher::PageFetcher;
pub use flatten::flatten_html;
pub use model::{ExtractionOutcome, RecipeRecord};
pub use providers::LlmProvider;
pub use store::{RecordStore, StoredRecipe};

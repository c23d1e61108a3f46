//! Structured recipe extraction through a completion provider.

mod prompt;

pub use prompt::{build_extraction_prompt, EXTRACTION_PROMPT};

use crate::error::CrawlError;
use crate::model::{ExtractionOutcome, RecipeRecord};
use crate::providers::LlmProvider;
use log::{debug, info};
use serde_json::Value;

const OPENING_FENCE: &str = "```json";
const CLOSING_FENCE: &str = "```";

/// Turns page text into a [`RecipeRecord`] with one completion request.
pub struct RecipeExtractor {
    provider: Box<dyn LlmProvider>,
    language: String,
}

impl RecipeExtractor {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            language: "english".to_string(),
        }
    }

    /// Language every extracted field is translated to
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Extracts a recipe from flattened page text.
    ///
    /// A model-reported problem is `Ok(ExtractionOutcome::Failed)`; an answer
    /// that is not a JSON object is `Err(CrawlError::MalformedExtraction)`.
    pub async fn extract(
        &self,
        text: &str,
        source_url: Option<&str>,
    ) -> Result<ExtractionOutcome, CrawlError> {
        let prompt = build_extraction_prompt(text, source_url, &self.language);
        info!(
            "Extracting recipe with {} ({} characters of page text)",
            self.provider.provider_name(),
            text.len()
        );

        let response = self.provider.complete(&prompt).await?;
        debug!("Completion response: {}", response);

        parse_response(&response)
    }
}

/// Strips a surrounding markdown code fence from a completion response.
///
/// Character-set trimming, not a markdown parse: when the text starts with
/// "```json", every leading and trailing character out of that marker is
/// removed, so a body ending in `j`, `s`, `o` or `n` loses those characters too.
pub fn clean_response(response: &str) -> &str {
    let mut text = response;
    if text.starts_with(OPENING_FENCE) {
        text = text
            .trim_matches(|c: char| OPENING_FENCE.contains(c))
            .trim();
    }
    if text.ends_with(CLOSING_FENCE) {
        text = text.trim_end_matches('`').trim();
    }
    text
}

/// Reads a completion response as an extraction outcome.
pub fn parse_response(response: &str) -> Result<ExtractionOutcome, CrawlError> {
    let cleaned = clean_response(response);

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| CrawlError::MalformedExtraction(format!("malformed JSON: {e}")))?;

    let Value::Object(mut object) = value else {
        return Err(CrawlError::MalformedExtraction(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    if let Some(error) = object.get("error") {
        return Ok(ExtractionOutcome::Failed(reason_text(error)));
    }

    // Both are assigned by the record store, never taken from the model.
    object.remove("id");
    object.remove("source_url");

    let record: RecipeRecord = serde_json::from_value(Value::Object(object))
        .map_err(|e| CrawlError::MalformedExtraction(format!("unexpected recipe shape: {e}")))?;

    Ok(ExtractionOutcome::Extracted(record))
}

fn reason_text(error: &Value) -> String {
    match error {
        Value::String(reason) => reason.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

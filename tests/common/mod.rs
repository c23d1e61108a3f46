#![allow(dead_code)]

use async_trait::async_trait;
use recipe_crawler::{
    CrawlError, Crawler, LlmProvider, PageFetcher, RecipeExtractor, RecordStore,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Answers with the response whose marker appears in the prompt.
pub struct ScriptedProvider {
    script: Vec<(String, String)>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            script: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn on(mut self, marker: &str, response: impl Into<String>) -> Self {
        self.script.push((marker.to_string(), response.into()));
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CrawlError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| r#"{"error": "no recipe on this page"}"#.to_string()))
    }
}

pub fn page(marker: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script>window.tracking = "do not leak";</script>
        </head>
        <body>
            <h1>{marker}</h1>
            <p>Some ingredients and instructions</p>
        </body>
        </html>
        "#
    )
}

pub fn recipe_json(title: &str, links: &[String]) -> String {
    serde_json::json!({
        "title": title,
        "ingredients": ["2 eggs", "100 g flour"],
        "core_ingredients": ["eggs", "flour"],
        "instructions": "Mix and bake.",
        "tags": ["baking"],
        "diet_type": "Vegetarian",
        "cuisine": "German",
        "time_to_eat": 30,
        "suggestion_links": links,
        "img_links": []
    })
    .to_string()
}

pub fn crawler(provider: ScriptedProvider, dir: &Path) -> Crawler {
    Crawler::new(
        PageFetcher::new(None).unwrap(),
        RecipeExtractor::new(Box::new(provider)),
        RecordStore::new(dir),
    )
}

pub fn stored_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

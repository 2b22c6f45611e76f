//! Podcast content generation
//!
//! [`ContentGenerator`] is the entry point: recent matches, scripts, topic
//! ideas and summaries, all produced through one model fallback chain.

pub mod prompts;

use crate::config::GeminiConfig;
use crate::error::{DinerError, Result};
use crate::llm::{create_model, first_success, strip_fences, Schema, TextModel};
use crate::types::{MatchData, PodcastConfig, Speaker, TranscriptMessage};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const DEFAULT_MATCH_COUNT: usize = 7;
pub const DEFAULT_TOPIC_COUNT: usize = 5;

/// Match returned when the model cannot supply real ones
pub fn placeholder_matches() -> Vec<MatchData> {
    vec![MatchData {
        id: "ind-vs-aus-1st-t20i-2025".to_string(),
        match_title: "India vs Australia, 1st T-Twenty-I".to_string(),
        venue: "Nagpur — VCA Stadium".to_string(),
        result: "India won by 6 wickets".to_string(),
        score_summary: "AUS 175/8 (20), IND 176/4 (19.2)".to_string(),
        top_performers: vec![
            "Virat Kohli: 82* (53)".to_string(),
            "Jasprit Bumrah: 2/26 (4)".to_string(),
        ],
    }]
}

/// Content generation client
#[derive(Clone)]
pub struct ContentGenerator {
    model: Arc<dyn TextModel>,
    models: Vec<String>,
}

impl ContentGenerator {
    /// Build a client over any backend, trying `models` in order
    pub fn new(model: Arc<dyn TextModel>, models: Vec<String>) -> Self {
        Self { model, models }
    }

    /// Build a Gemini-backed client
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        Ok(Self::new(create_model(config)?, config.model_chain()))
    }

    /// Models in attempt order
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Run `prompt` through the fallback chain and return fence-stripped text
    pub async fn generate_text(&self, prompt: &str, schema: Option<&Schema>) -> Result<String> {
        let text = first_success(&self.models, |name| {
            let name = name.to_string();
            let model = Arc::clone(&self.model);
            async move { model.generate(&name, prompt, schema).await }
        })
        .await?;

        Ok(strip_fences(&text))
    }

    async fn generate_json<T: DeserializeOwned>(&self, prompt: &str, schema: &Schema) -> Result<T> {
        let text = self.generate_text(prompt, Some(schema)).await?;
        parse_json(&text)
    }

    /// Recent completed matches. Never fails: falls back to a placeholder match.
    pub async fn fetch_recent_matches(&self, count: usize) -> Vec<MatchData> {
        let prompt = prompts::build_matches_prompt(count);

        match self
            .generate_json::<Vec<MatchData>>(&prompt, &prompts::matches_schema())
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(
                    backend = self.model.name(),
                    error = %e,
                    "Error fetching recent matches, using placeholder"
                );
                placeholder_matches()
            }
        }
    }

    /// Full episode script
    pub async fn generate_podcast_script(
        &self,
        config: &PodcastConfig,
        topic: &str,
        speakers: &[Speaker],
        matches: Option<&[MatchData]>,
    ) -> Result<Vec<TranscriptMessage>> {
        let today = chrono::Local::now().date_naive();
        let prompt = prompts::build_script_prompt(config, topic, speakers, matches, today);
        self.generate_json(&prompt, &prompts::script_schema()).await
    }

    pub async fn generate_topic_suggestions(&self, count: usize) -> Result<Vec<String>> {
        let prompt = prompts::build_topics_prompt(count);
        self.generate_json(&prompt, &prompts::topics_schema()).await
    }

    /// Free-text summary of a transcript
    pub async fn generate_podcast_summary(&self, transcript: &[TranscriptMessage]) -> Result<String> {
        let prompt = prompts::build_summary_prompt(transcript);
        let text = self.generate_text(&prompt, None).await?;
        Ok(strip_fences(&text))
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        DinerError::parse(
            format!("Failed to parse model response as JSON: {}", e),
            Some(text.to_string()),
        )
    })
}

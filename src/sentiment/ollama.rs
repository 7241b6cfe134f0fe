//! Local-model classification backend via Ollama
//! Prompts the model for a three-way probability distribution and maps it
//! to a label plus confidence. Any load or inference failure surfaces as
//! `ClassificationUnavailable` so the pipeline can keep the headline with
//! its sentiment omitted.

use std::time::Duration;

use ollama_rs::{generation::completion::request::GenerationRequest, Ollama};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{info, warn};
use url::Url;

use super::{truncate_input, Distribution, SentimentBackend, SentimentScore};
use crate::data::{BriefError, BriefResult};

const CONNECT_CHECK_SECONDS: u64 = 10;

const PROMPT_TEMPLATE: &str = "You are a financial sentiment rater. \
Given the news headline below, estimate the probability that its sentiment \
is negative, neutral, or positive. Respond with valid JSON only, in the form \
{\"negative\": 0.0, \"neutral\": 0.0, \"positive\": 0.0}, with the three \
values summing to 1. Do not include any explanation or markdown formatting.\n\n\
Headline: ";

#[derive(Debug, Deserialize)]
struct RawDistribution {
    negative: f64,
    neutral: f64,
    positive: f64,
}

pub struct OllamaBackend {
    ollama: Ollama,
    model: String,
    request_timeout: Duration,
}

impl OllamaBackend {
    /// Connect to a local Ollama instance and verify it is reachable.
    /// Called once at process start; the handle is read-only afterwards.
    pub async fn new(ollama_url: &str, model: &str, timeout_seconds: u64) -> BriefResult<Self> {
        let parsed_url = Url::parse(ollama_url)
            .map_err(|e| BriefError::Config(format!("Invalid Ollama URL: {}", e)))?;
        let host = parsed_url
            .host_str()
            .ok_or_else(|| BriefError::Config("No host in Ollama URL".to_string()))?;
        let port = parsed_url.port().unwrap_or(11434);

        let ollama = Ollama::new(format!("http://{}", host), port);

        info!("Testing Ollama connectivity at {}", ollama_url);
        match timeout(
            Duration::from_secs(CONNECT_CHECK_SECONDS),
            ollama.list_local_models(),
        )
        .await
        {
            Ok(Ok(models)) => {
                let model_available = models.iter().any(|m| m.name.contains(model));
                if !model_available {
                    warn!(
                        "Model '{}' not found locally. Pull it with: ollama pull {}",
                        model, model
                    );
                }
            }
            Ok(Err(e)) => {
                return Err(BriefError::classification_unavailable(format!(
                    "Ollama API error when listing models: {}. Is Ollama running?",
                    e
                )));
            }
            Err(_) => {
                return Err(BriefError::classification_unavailable(format!(
                    "Timeout connecting to Ollama at {}",
                    ollama_url
                )));
            }
        }

        Ok(Self {
            ollama,
            model: model.to_string(),
            request_timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

#[async_trait::async_trait]
impl SentimentBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn classify(&self, text: &str) -> BriefResult<SentimentScore> {
        let prompt = format!("{}{}", PROMPT_TEMPLATE, truncate_input(text));
        let request = GenerationRequest::new(self.model.clone(), prompt);

        let response = match timeout(self.request_timeout, self.ollama.generate(request)).await {
            Ok(Ok(response)) => response.response,
            Ok(Err(e)) => {
                return Err(BriefError::classification_unavailable(format!(
                    "Ollama generation failed: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(BriefError::classification_unavailable(format!(
                    "Ollama request timed out after {}s",
                    self.request_timeout.as_secs()
                )));
            }
        };

        let json_content = extract_json_from_text(&response).ok_or_else(|| {
            BriefError::classification_unavailable("No valid JSON in model response")
        })?;

        let raw: RawDistribution = serde_json::from_str(&json_content).map_err(|e| {
            BriefError::classification_unavailable(format!("Malformed distribution JSON: {}", e))
        })?;

        SentimentScore::from_distribution(Distribution {
            negative: raw.negative,
            neutral: raw.neutral,
            positive: raw.positive,
        })
        .map_err(|e| BriefError::classification_unavailable(e.to_string()))
    }
}

/// Extract a JSON object from text that might contain markdown fencing
fn extract_json_from_text(text: &str) -> Option<String> {
    // JSON wrapped in a ```json code block
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return Some(text[start + 7..start + 7 + end].trim().to_string());
        }
    }

    // First balanced {...} span
    if let Some(start) = text.find('{') {
        let mut brace_count = 0;
        for (i, c) in text[start..].char_indices() {
            match c {
                '{' => brace_count += 1,
                '}' => {
                    brace_count -= 1;
                    if brace_count == 0 {
                        return Some(text[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }
    }

    None
}

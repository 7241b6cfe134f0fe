//! Remote chat-completion classification backend
//! A single-label call: the API returns one word, so the score degrades to
//! confidence 1.0 with no distribution.

use serde_json::json;
use tracing::debug;

use super::{truncate_input, SentimentBackend, SentimentLabel, SentimentScore};
use crate::data::{BriefError, BriefResult};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a financial sentiment rater. Classify the \
sentiment of the news headline the user sends. Respond with exactly one word: \
negative, neutral, or positive.";

pub struct OpenAiBackend {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, model: String, timeout_seconds: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .user_agent("marketbrief/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            api_key,
            model,
        }
    }

    fn parse_label(content: &str) -> BriefResult<SentimentLabel> {
        let normalized = content.trim().trim_end_matches('.').to_lowercase();
        match normalized.as_str() {
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            "positive" => Ok(SentimentLabel::Positive),
            other => Err(BriefError::classification_unavailable(format!(
                "Unexpected label from API: {:?}",
                other
            ))),
        }
    }
}

#[async_trait::async_trait]
impl SentimentBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn classify(&self, text: &str) -> BriefResult<SentimentScore> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": truncate_input(text)},
            ],
        });

        let response = self
            .http_client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                BriefError::classification_unavailable(format!("Completion request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BriefError::classification_unavailable(format!(
                "Completion API error ({}): {}",
                status, error_text
            )));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            BriefError::classification_unavailable(format!("Malformed API response: {}", e))
        })?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                BriefError::classification_unavailable("No message content in API response")
            })?;

        debug!("Remote classification response: {}", content);

        let label = Self::parse_label(content)?;
        // Single-label call: full confidence, no distribution to report
        SentimentScore::single(label, 1.0)
    }
}

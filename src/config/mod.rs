use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::sentiment::corrector::DEFAULT_NEGATIVE_KEYWORDS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub apis: ApiConfig,
    pub sentiment: SentimentConfig,
    pub pipeline: PipelineConfig,
    /// Tickers to report on, in the order they should appear
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub news_api_key: Option<String>,
    pub polygon_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// "ollama", "openai", or "lexicon"
    pub backend: String,
    pub ollama_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// Keywords that trigger the neutral-to-negative rule correction
    pub override_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub article_cap: usize,
    pub emerging_threshold_pct: f64,
    pub max_concurrency: usize,
    /// Calendar days of price history to request per ticker
    pub lookback_days: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file - this sets env vars that aren't already set
        dotenv::dotenv().ok();

        let config = Config {
            apis: ApiConfig {
                news_api_key: env::var("NEWS_API_KEY").ok(),
                polygon_api_key: env::var("POLYGON_API_KEY").ok(),
                openai_api_key: env::var("OPENAI_API_KEY").ok(),
            },
            sentiment: SentimentConfig {
                backend: env::var("SENTIMENT_BACKEND").unwrap_or_else(|_| "lexicon".to_string()),
                ollama_url: env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                model: env::var("SENTIMENT_MODEL")
                    .unwrap_or_else(|_| "llama3.2:3b".to_string()),
                timeout_seconds: env::var("SENTIMENT_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid SENTIMENT_TIMEOUT_SECONDS value")?,
                override_keywords: env::var("CORRECTOR_KEYWORDS")
                    .map(|raw| {
                        raw.split(',')
                            .map(|k| k.trim().to_string())
                            .filter(|k| !k.is_empty())
                            .collect()
                    })
                    .unwrap_or_else(|_| default_override_keywords()),
            },
            pipeline: PipelineConfig {
                article_cap: env::var("ARTICLE_CAP")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("Invalid ARTICLE_CAP value")?,
                emerging_threshold_pct: env::var("EMERGING_THRESHOLD_PCT")
                    .unwrap_or_else(|_| "5.0".to_string())
                    .parse()
                    .context("Invalid EMERGING_THRESHOLD_PCT value")?,
                max_concurrency: env::var("MAX_CONCURRENCY")
                    .unwrap_or_else(|_| "8".to_string())
                    .parse()
                    .context("Invalid MAX_CONCURRENCY value")?,
                lookback_days: env::var("LOOKBACK_DAYS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("Invalid LOOKBACK_DAYS value")?,
            },
            tickers: env::var("TICKERS")
                .unwrap_or_else(|_| "AAPL,MSFT,GOOG,TSLA".to_string())
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };

        Ok(config)
    }
}

fn default_override_keywords() -> Vec<String> {
    DEFAULT_NEGATIVE_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apis: ApiConfig {
                news_api_key: None,
                polygon_api_key: None,
                openai_api_key: None,
            },
            sentiment: SentimentConfig {
                backend: "lexicon".to_string(),
                ollama_url: "http://localhost:11434".to_string(),
                model: "llama3.2:3b".to_string(),
                timeout_seconds: 30,
                override_keywords: default_override_keywords(),
            },
            pipeline: PipelineConfig {
                article_cap: 5,
                emerging_threshold_pct: 5.0,
                max_concurrency: 8,
                lookback_days: 5,
            },
            tickers: vec![
                "AAPL".to_string(),
                "MSFT".to_string(),
                "GOOG".to_string(),
                "TSLA".to_string(),
            ],
        }
    }
}

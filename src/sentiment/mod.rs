//! Headline sentiment classification
//! One capability - "produce a label plus confidence for a text span" -
//! behind a pluggable backend: local Ollama model, remote chat-completion
//! API, or keyword lexicon.

pub mod corrector;
pub mod lexicon;
pub mod ollama;
pub mod openai;

pub use corrector::RuleCorrector;
pub use lexicon::LexiconBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{BriefError, BriefResult};

/// Maximum number of characters fed to a backend. Longer texts are
/// truncated, never rejected (analogous to a model's token window).
pub const MAX_INPUT_CHARS: usize = 512;

/// Tolerance when checking that a probability distribution sums to 1.0
const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability mass over the three sentiment labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl Distribution {
    pub fn sum(&self) -> f64 {
        self.negative + self.neutral + self.positive
    }

    /// Rescale so the three masses sum to 1.0
    pub fn normalized(&self) -> BriefResult<Distribution> {
        let sum = self.sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(BriefError::parse_error(format!(
                "Distribution cannot be normalized (sum: {})",
                sum
            )));
        }
        if self.negative < 0.0 || self.neutral < 0.0 || self.positive < 0.0 {
            return Err(BriefError::parse_error(
                "Distribution contains negative mass",
            ));
        }
        Ok(Distribution {
            negative: self.negative / sum,
            neutral: self.neutral / sum,
            positive: self.positive / sum,
        })
    }

    /// Label holding the largest probability mass
    pub fn argmax(&self) -> SentimentLabel {
        let mut label = SentimentLabel::Negative;
        let mut best = self.negative;
        if self.neutral > best {
            label = SentimentLabel::Neutral;
            best = self.neutral;
        }
        if self.positive > best {
            label = SentimentLabel::Positive;
        }
        label
    }

    pub fn mass(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Positive => self.positive,
        }
    }
}

/// A sentiment judgment for one text span. The distribution is present for
/// model backends that expose one; single-label backends omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub distribution: Option<Distribution>,
}

impl SentimentScore {
    /// Build a score from a raw distribution: normalizes it, takes the
    /// arg-max label, and sets confidence to that label's mass.
    pub fn from_distribution(distribution: Distribution) -> BriefResult<Self> {
        let normalized = distribution.normalized()?;
        debug_assert!((normalized.sum() - 1.0).abs() <= DISTRIBUTION_TOLERANCE);
        let label = normalized.argmax();
        Ok(Self {
            label,
            confidence: normalized.mass(label),
            distribution: Some(normalized),
        })
    }

    /// Build a score from a single label without a distribution
    pub fn single(label: SentimentLabel, confidence: f64) -> BriefResult<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(BriefError::validation_error(
                "confidence",
                "Confidence must be within [0, 1]",
            ));
        }
        Ok(Self {
            label,
            confidence,
            distribution: None,
        })
    }
}

/// Truncate text to the backend input bound, on a char boundary
pub fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Pluggable classification backend. Implementations are built once at
/// startup and shared read-only across concurrent classification calls.
#[async_trait::async_trait]
pub trait SentimentBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, text: &str) -> BriefResult<SentimentScore>;
}

/// Build the configured backend. The handle is created once per process
/// and shared; tests inject their own `SentimentBackend` instead.
pub async fn backend_from_config(config: &Config) -> BriefResult<Arc<dyn SentimentBackend>> {
    match config.sentiment.backend.as_str() {
        "ollama" => {
            let backend = OllamaBackend::new(
                &config.sentiment.ollama_url,
                &config.sentiment.model,
                config.sentiment.timeout_seconds,
            )
            .await?;
            Ok(Arc::new(backend))
        }
        "openai" => {
            let api_key = config.apis.openai_api_key.clone().ok_or_else(|| {
                BriefError::Config("OPENAI_API_KEY is required for the openai backend".to_string())
            })?;
            Ok(Arc::new(OpenAiBackend::new(
                api_key,
                config.sentiment.model.clone(),
                config.sentiment.timeout_seconds,
            )))
        }
        "lexicon" => Ok(Arc::new(LexiconBackend::new())),
        other => Err(BriefError::Config(format!(
            "Unknown sentiment backend: {} (expected ollama, openai, or lexicon)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_distribution_argmax_and_confidence() {
        let score = SentimentScore::from_distribution(Distribution {
            negative: 0.7,
            neutral: 0.2,
            positive: 0.1,
        })
        .expect("valid distribution");

        assert_eq!(score.label, SentimentLabel::Negative);
        assert!((score.confidence - 0.7).abs() < 1e-9);
        let dist = score.distribution.expect("distribution present");
        assert!((dist.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_distribution_normalizes() {
        // Raw model output in percentage points
        let score = SentimentScore::from_distribution(Distribution {
            negative: 12.0,
            neutral: 80.0,
            positive: 8.0,
        })
        .expect("valid distribution");

        assert_eq!(score.label, SentimentLabel::Neutral);
        assert!((score.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_from_distribution_rejects_zero_mass() {
        let result = SentimentScore::from_distribution(Distribution {
            negative: 0.0,
            neutral: 0.0,
            positive: 0.0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_single_rejects_out_of_range_confidence() {
        assert!(SentimentScore::single(SentimentLabel::Positive, 1.2).is_err());
        assert!(SentimentScore::single(SentimentLabel::Positive, -0.1).is_err());
        assert!(SentimentScore::single(SentimentLabel::Positive, 1.0).is_ok());
    }

    #[test]
    fn test_truncate_input_bounds_length() {
        let long = "a".repeat(MAX_INPUT_CHARS * 2);
        assert_eq!(truncate_input(&long).chars().count(), MAX_INPUT_CHARS);

        let short = "profits plunge";
        assert_eq!(truncate_input(short), short);
    }

    #[test]
    fn test_truncate_input_respects_char_boundaries() {
        let text = "é".repeat(MAX_INPUT_CHARS + 10);
        let truncated = truncate_input(&text);
        assert_eq!(truncated.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_label_serde_roundtrip() {
        let json = serde_json::to_string(&SentimentLabel::Negative).expect("serialize");
        assert_eq!(json, "\"negative\"");
        let label: SentimentLabel = serde_json::from_str("\"positive\"").expect("deserialize");
        assert_eq!(label, SentimentLabel::Positive);
    }
}

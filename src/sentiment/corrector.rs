//! Deterministic keyword override for classifier output
//! The base classifiers systematically mislabel alarming but lexically
//! neutral headlines ("Company X profits plunge amid scandal") as neutral
//! with high confidence. The corrector re-labels those as negative.

use super::{SentimentLabel, SentimentScore};

/// Negative financial terms that trigger the neutral-to-negative override
pub const DEFAULT_NEGATIVE_KEYWORDS: &[&str] = &[
    "plunge",
    "plummet",
    "bankruptcy",
    "write-down",
    "writedown",
    "sell-off",
    "selloff",
    "default",
    "fraud",
    "scandal",
    "lawsuit",
    "layoffs",
    "downgrade",
    "recall",
    "crash",
];

/// Confidence stamped onto a corrected label. A fixed value, not derived
/// from the original distribution.
const CORRECTED_CONFIDENCE: f64 = 0.95;

/// Confidence above which a neutral label is considered suspect
const NEUTRAL_CONFIDENCE_FLOOR: f64 = 0.9;

/// Pure, deterministic post-processing over classifier output
#[derive(Debug, Clone)]
pub struct RuleCorrector {
    keywords: Vec<String>,
}

impl RuleCorrector {
    /// Build a corrector from a keyword list; matching is case-insensitive
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
        }
    }

    /// Apply the override policy. Triggers only when the label is neutral
    /// with confidence above 0.9 and the text contains a listed keyword;
    /// otherwise returns the input unchanged. Idempotent: a corrected score
    /// is never neutral, so the guard fails on re-application.
    pub fn correct(&self, text: &str, score: &SentimentScore) -> SentimentScore {
        if score.label != SentimentLabel::Neutral || score.confidence <= NEUTRAL_CONFIDENCE_FLOOR {
            return score.clone();
        }

        let lowered = text.to_lowercase();
        if self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            return SentimentScore {
                label: SentimentLabel::Negative,
                confidence: CORRECTED_CONFIDENCE,
                distribution: score.distribution,
            };
        }

        score.clone()
    }
}

impl Default for RuleCorrector {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATIVE_KEYWORDS)
    }
}

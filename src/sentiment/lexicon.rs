//! Keyword-lexicon classification backend (no model, no network)
//! Degrades to a discrete 0/1 confidence: 1.0 when keyword evidence was
//! found, 0.0 when the text matched nothing.

use super::{truncate_input, SentimentBackend, SentimentLabel, SentimentScore};
use crate::data::BriefResult;

const POSITIVE_WORDS: &[&str] = &[
    "gain", "surge", "rally", "jump", "rise", "soar", "rebound", "beat",
    "record", "upgrade", "strong", "growth", "profit", "bullish",
];

const NEGATIVE_WORDS: &[&str] = &[
    "fall", "drop", "crash", "decline", "plunge", "slump", "miss", "cut",
    "downgrade", "weak", "loss", "concern", "fear", "bearish",
];

pub struct LexiconBackend;

impl LexiconBackend {
    pub fn new() -> Self {
        Self
    }

    fn score_text(&self, text: &str) -> SentimentScore {
        let lowered = text.to_lowercase();

        let mut positive_count = 0;
        let mut negative_count = 0;
        for word in lowered.split_whitespace() {
            if POSITIVE_WORDS.iter().any(|w| word.contains(w)) {
                positive_count += 1;
            }
            if NEGATIVE_WORDS.iter().any(|w| word.contains(w)) {
                negative_count += 1;
            }
        }

        // No evidence at all: neutral with zero confidence so downstream
        // consumers can tell "unscored" apart from "confidently neutral"
        if positive_count == 0 && negative_count == 0 {
            return SentimentScore {
                label: SentimentLabel::Neutral,
                confidence: 0.0,
                distribution: None,
            };
        }

        let label = match positive_count.cmp(&negative_count) {
            std::cmp::Ordering::Greater => SentimentLabel::Positive,
            std::cmp::Ordering::Less => SentimentLabel::Negative,
            std::cmp::Ordering::Equal => SentimentLabel::Neutral,
        };

        SentimentScore {
            label,
            confidence: 1.0,
            distribution: None,
        }
    }
}

impl Default for LexiconBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SentimentBackend for LexiconBackend {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> BriefResult<SentimentScore> {
        Ok(self.score_text(truncate_input(text)))
    }
}

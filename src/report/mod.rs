//! Typed report model and assembly invariants
//! A `Report` is built once per run from ephemeral inputs and handed to a
//! renderer; it has no persisted identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::data::{BriefError, BriefResult};
use crate::sentiment::SentimentScore;

/// A news title paired with its sentiment judgment. `sentiment` is `None`
/// when classification was unavailable for this headline; the headline is
/// still reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSignal {
    pub title: String,
    pub url: String,
    pub sentiment: Option<SentimentScore>,
}

/// Per-ticker price change over the two most recent closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub ticker: String,
    pub latest_close: f64,
    pub previous_close: f64,
    /// Full-precision percent change; use `percent_change_rounded` for display
    pub percent_change: f64,
}

impl PriceQuote {
    /// Percent change rounded to 2 decimal places for display
    pub fn percent_change_rounded(&self) -> f64 {
        (self.percent_change * 100.0).round() / 100.0
    }
}

/// A ticker whose price change met the emerging-mover threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergingEntry {
    pub ticker: String,
    pub latest_close: f64,
    pub percent_change: f64,
}

impl EmergingEntry {
    pub fn percent_change_rounded(&self) -> f64 {
        (self.percent_change * 100.0).round() / 100.0
    }
}

impl From<&PriceQuote> for EmergingEntry {
    fn from(quote: &PriceQuote) -> Self {
        Self {
            ticker: quote.ticker.clone(),
            latest_close: quote.latest_close,
            percent_change: quote.percent_change,
        }
    }
}

/// Per-item failure record for anything skipped during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    /// Ticker symbol or article identifier
    pub item: String,
    pub reason: String,
}

impl ItemError {
    pub fn new<S: Into<String>>(item: S, error: &BriefError) -> Self {
        Self {
            item: item.into(),
            reason: error.to_string(),
        }
    }
}

/// One assembled market brief
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Source order preserved, capped to the configured article count
    pub headlines: Vec<HeadlineSignal>,
    /// Ticker input order preserved, each ticker at most once
    pub quotes: Vec<PriceQuote>,
    /// Always a sub-sequence of `quotes`
    pub emerging: Vec<EmergingEntry>,
}

impl Report {
    /// Compose a report from already-annotated parts. Performs only the
    /// structural checks; sentiment and price math are not re-derived here.
    /// An emerging entry absent from `quotes` (or out of quote order) means
    /// an upstream ordering bug and rejects construction.
    pub fn assemble(
        generated_at: DateTime<Utc>,
        mut headlines: Vec<HeadlineSignal>,
        quotes: Vec<PriceQuote>,
        emerging: Vec<EmergingEntry>,
        article_cap: usize,
    ) -> BriefResult<Report> {
        headlines.truncate(article_cap);

        for headline in &headlines {
            if let Some(score) = &headline.sentiment {
                if !(0.0..=1.0).contains(&score.confidence) {
                    return Err(BriefError::invariant(format!(
                        "Headline {:?} carries confidence {} outside [0, 1]",
                        headline.title, score.confidence
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for quote in &quotes {
            if !seen.insert(quote.ticker.as_str()) {
                return Err(BriefError::invariant(format!(
                    "Ticker {} appears more than once in quotes",
                    quote.ticker
                )));
            }
        }

        // Emerging must be a sub-sequence of quotes: every entry present,
        // in the same relative order
        let mut quote_iter = quotes.iter();
        for entry in &emerging {
            let found = quote_iter.any(|q| q.ticker == entry.ticker);
            if !found {
                return Err(BriefError::invariant(format!(
                    "Emerging entry {} is not a sub-sequence of quotes",
                    entry.ticker
                )));
            }
        }

        Ok(Report {
            generated_at,
            headlines,
            quotes,
            emerging,
        })
    }
}

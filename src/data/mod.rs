//! Input types and fetch clients for news headlines and price history
//! Provides error handling and basic input validation

pub mod errors;
pub mod news;
pub mod prices;

// Re-export commonly used types
pub use errors::{BriefError, BriefResult};
pub use news::NewsClient;
pub use prices::PriceClient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A news article headline, as supplied by the upstream fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
}

/// A single daily closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosingPrice {
    pub date: NaiveDate,
    pub close: f64,
}

/// Validation helpers
pub mod validation {
    use super::*;

    /// Validate a ticker symbol (basic US market symbols)
    pub fn validate_ticker(ticker: &str) -> BriefResult<()> {
        if ticker.is_empty() {
            return Err(BriefError::validation_error("ticker", "Ticker cannot be empty"));
        }

        if ticker.len() > 10 {
            return Err(BriefError::validation_error("ticker", "Ticker too long (max 10 chars)"));
        }

        if !ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '^')
        {
            return Err(BriefError::validation_error(
                "ticker",
                "Ticker must contain only letters, digits, '.', '-' or '^'",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::validate_ticker;

    #[test]
    fn test_validate_ticker() {
        assert!(validate_ticker("AAPL").is_ok());
        assert!(validate_ticker("BRK.B").is_ok());
        assert!(validate_ticker("^VIX").is_ok());
        assert!(validate_ticker("").is_err());
        assert!(validate_ticker("WAYTOOLONGTICKER").is_err());
        assert!(validate_ticker("AA PL").is_err());
    }
}

//! Price-change math and emerging-mover detection

use crate::data::{BriefError, BriefResult, ClosingPrice};
use crate::report::{EmergingEntry, PriceQuote};

/// Observations needed to compute a change: the two most recent closes
pub const PRICE_WINDOW: usize = 2;

/// Compute the percent change for a ticker from its close series, in
/// ascending date order. Fewer than two observations is an expected
/// condition (newly listed instrument, market holiday) and surfaces as
/// `InsufficientHistory`; a zero previous close surfaces as
/// `DivisionByZero`. Both are per-item and non-fatal to the run.
pub fn compute_quote(ticker: &str, series: &[ClosingPrice]) -> BriefResult<PriceQuote> {
    if series.len() < PRICE_WINDOW {
        return Err(BriefError::InsufficientHistory {
            ticker: ticker.to_string(),
            observed: series.len(),
            required: PRICE_WINDOW,
        });
    }

    let latest = series[series.len() - 1].close;
    let previous = series[series.len() - 2].close;

    if previous == 0.0 {
        return Err(BriefError::DivisionByZero {
            ticker: ticker.to_string(),
        });
    }

    Ok(PriceQuote {
        ticker: ticker.to_string(),
        latest_close: latest,
        previous_close: previous,
        percent_change: (latest - previous) / previous * 100.0,
    })
}

/// Filter quotes whose change meets the threshold (inclusive). Pure,
/// order-preserving; an empty result is valid and renders as "no major
/// moves".
pub fn detect_emerging(quotes: &[PriceQuote], threshold: f64) -> Vec<EmergingEntry> {
    quotes
        .iter()
        .filter(|q| q.percent_change >= threshold)
        .map(EmergingEntry::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> Vec<ClosingPrice> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| ClosingPrice {
                date: NaiveDate::from_ymd_opt(2026, 8, 1)
                    .expect("valid date")
                    + chrono::Duration::days(i as i64),
                close,
            })
            .collect()
    }

    #[test]
    fn test_percent_change_formula() {
        let quote = compute_quote("AAPL", &series(&[100.0, 105.0])).expect("two closes");
        assert!((quote.latest_close - 105.0).abs() < f64::EPSILON);
        assert!((quote.previous_close - 100.0).abs() < f64::EPSILON);
        assert!((quote.percent_change - 5.0).abs() < 1e-9);
        assert!((quote.percent_change_rounded() - 5.00).abs() < 1e-9);
    }

    #[test]
    fn test_uses_two_most_recent_closes() {
        let quote = compute_quote("AAPL", &series(&[90.0, 100.0, 110.0])).expect("three closes");
        assert!((quote.previous_close - 100.0).abs() < f64::EPSILON);
        assert!((quote.latest_close - 110.0).abs() < f64::EPSILON);
        assert!((quote.percent_change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_change() {
        let quote = compute_quote("TSLA", &series(&[200.0, 190.0])).expect("two closes");
        assert!((quote.percent_change - (-5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_single_observation_is_insufficient_history() {
        let result = compute_quote("IPO", &series(&[42.0]));
        match result {
            Err(BriefError::InsufficientHistory {
                ticker,
                observed,
                required,
            }) => {
                assert_eq!(ticker, "IPO");
                assert_eq!(observed, 1);
                assert_eq!(required, 2);
            }
            other => panic!("expected InsufficientHistory, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_series_is_insufficient_history() {
        assert!(matches!(
            compute_quote("AAPL", &[]),
            Err(BriefError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_zero_previous_close_is_division_by_zero() {
        let result = compute_quote("ZMB", &series(&[0.0, 10.0]));
        assert!(matches!(result, Err(BriefError::DivisionByZero { .. })));
    }

    #[test]
    fn test_detect_emerging_is_inclusive_and_order_preserving() {
        let quotes: Vec<PriceQuote> = [("AAPL", 5.0), ("MSFT", 4.99), ("TSLA", 12.3), ("GOOG", 5.01)]
            .iter()
            .map(|(ticker, change)| PriceQuote {
                ticker: ticker.to_string(),
                latest_close: 100.0 + change,
                previous_close: 100.0,
                percent_change: *change,
            })
            .collect();

        let emerging = detect_emerging(&quotes, 5.0);
        let tickers: Vec<&str> = emerging.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "TSLA", "GOOG"]);
        assert!(emerging.iter().all(|e| e.percent_change >= 5.0));
    }

    #[test]
    fn test_detect_emerging_empty_is_valid() {
        let quotes = vec![PriceQuote {
            ticker: "AAPL".to_string(),
            latest_close: 101.0,
            previous_close: 100.0,
            percent_change: 1.0,
        }];
        assert!(detect_emerging(&quotes, 5.0).is_empty());
        assert!(detect_emerging(&[], 5.0).is_empty());
    }
}

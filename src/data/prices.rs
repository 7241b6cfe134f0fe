use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{BriefError, BriefResult, ClosingPrice};

/// Polygon.io daily aggregates response (close and timestamp only)
#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    status: String,
    results: Option<Vec<Aggregate>>,
}

#[derive(Debug, Deserialize)]
struct Aggregate {
    #[serde(rename = "c")]
    close: f64,
    #[serde(rename = "t")]
    timestamp: i64, // Unix milliseconds
}

pub struct PriceClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl PriceClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("marketbrief/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            api_key,
        }
    }

    /// Fetch daily closing prices for a ticker over the last `days` calendar
    /// days, in ascending date order. A short (or empty) series is a valid
    /// result: newly listed instruments and market holidays produce fewer
    /// observations, and the caller decides what to do with them.
    pub async fn fetch_daily_closes(&self, ticker: &str, days: u32) -> BriefResult<Vec<ClosingPrice>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            BriefError::Config("POLYGON_API_KEY must be set to fetch prices".to_string())
        })?;

        let end_date = Utc::now().date_naive();
        let start_date = end_date - chrono::Duration::days(days as i64);

        tracing::info!("Fetching daily closes for {} since {}", ticker, start_date);

        let url = format!(
            "https://api.polygon.io/v2/aggs/ticker/{}/range/1/day/{}/{}?adjusted=true&sort=asc&apiKey={}",
            ticker,
            start_date.format("%Y-%m-%d"),
            end_date.format("%Y-%m-%d"),
            api_key
        );

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BriefError::Api {
                status_code,
                message: format!("Polygon.io: {}", error_text),
            });
        }

        let aggregates: AggregatesResponse = response.json().await?;

        // DELAYED is returned for free/basic tier subscriptions; the data is
        // still valid for a daily brief
        match aggregates.status.as_str() {
            "OK" | "DELAYED" => {}
            status => {
                return Err(BriefError::Internal(format!(
                    "Polygon.io returned error status: {}",
                    status
                )));
            }
        }

        let mut closes = Vec::new();
        for agg in aggregates.results.unwrap_or_default() {
            let datetime = DateTime::from_timestamp_millis(agg.timestamp)
                .ok_or_else(|| BriefError::parse_error(format!("Invalid timestamp: {}", agg.timestamp)))?;
            closes.push(ClosingPrice {
                date: datetime.date_naive(),
                close: agg.close,
            });
        }

        tracing::info!("Fetched {} daily closes for {}", closes.len(), ticker);
        Ok(closes)
    }
}

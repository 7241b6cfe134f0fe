//! End-to-end pipeline tests with a scripted sentiment backend

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use marketbrief::config::Config;
use marketbrief::data::{Article, BriefError, BriefResult, ClosingPrice};
use marketbrief::orchestrator::BriefOrchestrator;
use marketbrief::sentiment::{Distribution, SentimentBackend, SentimentLabel, SentimentScore};

/// Deterministic backend double: scripted responses per title, optional
/// per-title failure and delay
#[derive(Default)]
struct ScriptedBackend {
    scripts: HashMap<String, SentimentScore>,
    fail_titles: Vec<String>,
    delays_ms: HashMap<String, u64>,
}

impl ScriptedBackend {
    fn script(mut self, title: &str, label: SentimentLabel, confidence: f64) -> Self {
        self.scripts.insert(
            title.to_string(),
            SentimentScore {
                label,
                confidence,
                distribution: None,
            },
        );
        self
    }

    fn fail_on(mut self, title: &str) -> Self {
        self.fail_titles.push(title.to_string());
        self
    }

    fn delay(mut self, title: &str, ms: u64) -> Self {
        self.delays_ms.insert(title.to_string(), ms);
        self
    }
}

#[async_trait]
impl SentimentBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn classify(&self, text: &str) -> BriefResult<SentimentScore> {
        if let Some(ms) = self.delays_ms.get(text) {
            tokio::time::sleep(std::time::Duration::from_millis(*ms)).await;
        }
        if self.fail_titles.iter().any(|t| t == text) {
            return Err(BriefError::classification_unavailable("scripted failure"));
        }
        match self.scripts.get(text) {
            Some(score) => Ok(score.clone()),
            None => Ok(SentimentScore {
                label: SentimentLabel::Neutral,
                confidence: 0.5,
                distribution: None,
            }),
        }
    }
}

fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        url: format!("https://example.com/{}", title.len()),
    }
}

fn closes(values: &[f64]) -> Vec<ClosingPrice> {
    values
        .iter()
        .enumerate()
        .map(|(i, &close)| ClosingPrice {
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap() + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

fn orchestrator(backend: ScriptedBackend) -> BriefOrchestrator {
    BriefOrchestrator::with_backend(Config::default(), Arc::new(backend))
}

#[tokio::test]
async fn corrector_overrides_confident_neutral_with_keyword() {
    let title = "Company X profits plunge amid scandal";
    let backend = ScriptedBackend::default().script(title, SentimentLabel::Neutral, 0.93);

    let outcome = orchestrator(backend)
        .run(vec![article(title)], vec![])
        .await
        .expect("run completes");

    let sentiment = outcome.report.headlines[0]
        .sentiment
        .as_ref()
        .expect("headline classified");
    assert_eq!(sentiment.label, SentimentLabel::Negative);
    assert!((sentiment.confidence - 0.95).abs() < f64::EPSILON);
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn five_percent_mover_lands_in_emerging() {
    let histories = vec![("AAPL".to_string(), closes(&[100.0, 105.0]))];

    let outcome = orchestrator(ScriptedBackend::default())
        .run(vec![], histories)
        .await
        .expect("run completes");

    let quote = &outcome.report.quotes[0];
    assert!((quote.latest_close - 105.0).abs() < f64::EPSILON);
    assert!((quote.previous_close - 100.0).abs() < f64::EPSILON);
    assert!((quote.percent_change_rounded() - 5.00).abs() < 1e-9);

    // Threshold is inclusive: exactly 5.0% qualifies
    assert_eq!(outcome.report.emerging.len(), 1);
    assert_eq!(outcome.report.emerging[0].ticker, "AAPL");
}

#[tokio::test]
async fn short_history_is_skipped_not_fatal() {
    let histories = vec![
        ("AAPL".to_string(), closes(&[100.0, 102.0])),
        ("IPO".to_string(), closes(&[42.0])),
    ];

    let outcome = orchestrator(ScriptedBackend::default())
        .run(vec![], histories)
        .await
        .expect("run completes despite short history");

    let tickers: Vec<&str> = outcome
        .report
        .quotes
        .iter()
        .map(|q| q.ticker.as_str())
        .collect();
    assert_eq!(tickers, vec!["AAPL"]);
    assert!(outcome.report.emerging.iter().all(|e| e.ticker != "IPO"));

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].item, "IPO");
    assert!(outcome.errors[0].reason.contains("Insufficient history"));
}

#[tokio::test]
async fn zero_previous_close_is_skipped_not_fatal() {
    let histories = vec![("ZMB".to_string(), closes(&[0.0, 10.0]))];

    let outcome = orchestrator(ScriptedBackend::default())
        .run(vec![], histories)
        .await
        .expect("run completes despite zero close");

    assert!(outcome.report.quotes.is_empty());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].reason.contains("Division by zero"));
}

#[tokio::test]
async fn classification_failure_keeps_headline_without_sentiment() {
    let good = "Markets rally on upbeat outlook";
    let bad = "Unclassifiable headline";
    let backend = ScriptedBackend::default()
        .script(good, SentimentLabel::Positive, 0.88)
        .fail_on(bad);

    let outcome = orchestrator(backend)
        .run(vec![article(good), article(bad)], vec![])
        .await
        .expect("run completes despite backend failure");

    assert_eq!(outcome.report.headlines.len(), 2);
    assert!(outcome.report.headlines[0].sentiment.is_some());
    assert!(outcome.report.headlines[1].sentiment.is_none());

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].item, bad);
    assert!(outcome.errors[0].reason.contains("Classification unavailable"));
}

#[tokio::test]
async fn results_keep_input_order_regardless_of_completion_order() {
    // The first headline finishes last; order must still match input order
    let titles = ["slow one", "quick two", "quick three", "quick four"];
    let mut backend = ScriptedBackend::default().delay(titles[0], 150);
    for (i, title) in titles.iter().enumerate() {
        let label = if i % 2 == 0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };
        backend = backend.script(title, label, 0.8);
    }

    let articles: Vec<Article> = titles.iter().map(|t| article(t)).collect();
    let outcome = orchestrator(backend)
        .run(articles, vec![])
        .await
        .expect("run completes");

    let got: Vec<&str> = outcome
        .report
        .headlines
        .iter()
        .map(|h| h.title.as_str())
        .collect();
    assert_eq!(got, titles);
}

#[tokio::test]
async fn empty_inputs_yield_valid_empty_report() {
    let outcome = orchestrator(ScriptedBackend::default())
        .run(vec![], vec![])
        .await
        .expect("empty run completes");

    assert!(outcome.report.headlines.is_empty());
    assert!(outcome.report.quotes.is_empty());
    assert!(outcome.report.emerging.is_empty());
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn headlines_are_capped_to_configured_count() {
    let titles: Vec<String> = (0..9).map(|i| format!("headline {}", i)).collect();
    let articles: Vec<Article> = titles.iter().map(|t| article(t)).collect();

    let outcome = orchestrator(ScriptedBackend::default())
        .run(articles, vec![])
        .await
        .expect("run completes");

    assert_eq!(outcome.report.headlines.len(), 5);
    assert_eq!(outcome.report.headlines[0].title, "headline 0");
}

#[tokio::test]
async fn quote_order_matches_ticker_input_order() {
    let histories = vec![
        ("TSLA".to_string(), closes(&[100.0, 108.0])),
        ("AAPL".to_string(), closes(&[100.0, 101.0])),
        ("MSFT".to_string(), closes(&[100.0, 107.0])),
    ];

    let outcome = orchestrator(ScriptedBackend::default())
        .run(vec![], histories)
        .await
        .expect("run completes");

    let quotes: Vec<&str> = outcome
        .report
        .quotes
        .iter()
        .map(|q| q.ticker.as_str())
        .collect();
    assert_eq!(quotes, vec!["TSLA", "AAPL", "MSFT"]);

    // Emerging preserves the same relative order
    let emerging: Vec<&str> = outcome
        .report
        .emerging
        .iter()
        .map(|e| e.ticker.as_str())
        .collect();
    assert_eq!(emerging, vec!["TSLA", "MSFT"]);
}

#[tokio::test]
async fn model_distribution_flows_through_to_headline() {
    let title = "Chipmaker beats expectations";
    let mut backend = ScriptedBackend::default();
    backend.scripts.insert(
        title.to_string(),
        SentimentScore::from_distribution(Distribution {
            negative: 0.05,
            neutral: 0.15,
            positive: 0.80,
        })
        .expect("valid distribution"),
    );

    let outcome = orchestrator(backend)
        .run(vec![article(title)], vec![])
        .await
        .expect("run completes");

    let sentiment = outcome.report.headlines[0]
        .sentiment
        .as_ref()
        .expect("classified");
    assert_eq!(sentiment.label, SentimentLabel::Positive);
    let dist = sentiment.distribution.expect("distribution retained");
    assert!((dist.sum() - 1.0).abs() < 1e-6);
}

//! Brief pipeline orchestrator
//! Coordinates classification, correction, price math, emerging detection,
//! and report assembly. One run per invocation; a single item's failure
//! never cancels sibling work.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::{
    config::Config,
    data::{validation, Article, BriefError, ClosingPrice, NewsClient, PriceClient},
    pricing,
    report::{HeadlineSignal, ItemError, PriceQuote, Report},
    sentiment::{backend_from_config, RuleCorrector, SentimentBackend},
};

/// A completed run: the (possibly partial) report plus a parallel record
/// of everything that was skipped and why
#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    pub errors: Vec<ItemError>,
}

pub struct BriefOrchestrator {
    config: Config,
    backend: Arc<dyn SentimentBackend>,
    corrector: RuleCorrector,
}

impl BriefOrchestrator {
    /// Create an orchestrator with the configured backend. The backend
    /// handle is built once here and shared read-only across the run.
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing brief orchestrator");
        let backend = backend_from_config(&config)
            .await
            .context("Failed to initialize sentiment backend")?;
        info!("Sentiment backend ready: {}", backend.name());

        let corrector = RuleCorrector::new(&config.sentiment.override_keywords);
        Ok(Self {
            config,
            backend,
            corrector,
        })
    }

    /// Create an orchestrator with an injected backend (test seam)
    pub fn with_backend(config: Config, backend: Arc<dyn SentimentBackend>) -> Self {
        let corrector = RuleCorrector::new(&config.sentiment.override_keywords);
        Self {
            config,
            backend,
            corrector,
        }
    }

    /// Run the annotation and assembly pipeline over already-fetched inputs
    pub async fn run(
        &self,
        articles: Vec<Article>,
        histories: Vec<(String, Vec<ClosingPrice>)>,
    ) -> Result<RunOutcome> {
        let mut errors = Vec::new();

        info!("Classifying {} headlines", articles.len());
        let headlines = self.classify_headlines(&articles, &mut errors).await;

        info!("Computing price change for {} tickers", histories.len());
        let quotes = self.compute_quotes(&histories, &mut errors)?;

        let emerging = pricing::detect_emerging(&quotes, self.config.pipeline.emerging_threshold_pct);
        info!(
            "{} of {} tickers at or above the {}% threshold",
            emerging.len(),
            quotes.len(),
            self.config.pipeline.emerging_threshold_pct
        );

        let report = Report::assemble(
            Utc::now(),
            headlines,
            quotes,
            emerging,
            self.config.pipeline.article_cap,
        )
        .context("Report assembly failed")?;

        Ok(RunOutcome { report, errors })
    }

    /// Fetch headlines and price history from the live collaborators, then
    /// run the pipeline
    pub async fn run_live(&self) -> Result<RunOutcome> {
        let news_client = NewsClient::new(self.config.apis.news_api_key.clone());
        let price_client = PriceClient::new(self.config.apis.polygon_api_key.clone());

        let mut fetch_errors = Vec::new();

        let articles = match news_client
            .fetch_top_headlines(self.config.pipeline.article_cap)
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Headline fetch failed: {}", e);
                fetch_errors.push(ItemError::new("news", &e));
                Vec::new()
            }
        };

        let mut histories = Vec::new();
        for ticker in &self.config.tickers {
            match price_client
                .fetch_daily_closes(ticker, self.config.pipeline.lookback_days)
                .await
            {
                Ok(series) => histories.push((ticker.clone(), series)),
                Err(e) => {
                    warn!("Price fetch failed for {}: {}", ticker, e);
                    fetch_errors.push(ItemError::new(ticker.clone(), &e));
                }
            }
        }

        let mut outcome = self.run(articles, histories).await?;
        outcome.errors.splice(0..0, fetch_errors);
        Ok(outcome)
    }

    /// Classify every article under a bounded worker pool. Tasks are
    /// spawned in input order and their handles awaited in that same order,
    /// so completion order can never reorder the result.
    async fn classify_headlines(
        &self,
        articles: &[Article],
        errors: &mut Vec<ItemError>,
    ) -> Vec<HeadlineSignal> {
        let permits = self
            .config
            .pipeline
            .max_concurrency
            .min(articles.len())
            .max(1);
        let semaphore = Arc::new(Semaphore::new(permits));

        let mut handles = Vec::with_capacity(articles.len());
        for article in articles {
            let backend = Arc::clone(&self.backend);
            let semaphore = Arc::clone(&semaphore);
            let title = article.title.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| BriefError::classification_unavailable(e.to_string()))?;
                backend.classify(&title).await
            }));
        }

        let mut headlines = Vec::with_capacity(articles.len());
        for (article, handle) in articles.iter().zip(handles) {
            let sentiment = match handle.await {
                Ok(Ok(score)) => Some(self.corrector.correct(&article.title, &score)),
                Ok(Err(e)) => {
                    warn!("Classification failed for {:?}: {}", article.title, e);
                    errors.push(ItemError::new(article.title.clone(), &e));
                    None
                }
                Err(join_err) => {
                    let e = BriefError::classification_unavailable(format!(
                        "Classification task panicked: {}",
                        join_err
                    ));
                    errors.push(ItemError::new(article.title.clone(), &e));
                    None
                }
            };

            headlines.push(HeadlineSignal {
                title: article.title.clone(),
                url: article.url.clone(),
                sentiment,
            });
        }

        headlines
    }

    /// Compute quotes per ticker, recording recoverable failures and
    /// propagating everything else
    fn compute_quotes(
        &self,
        histories: &[(String, Vec<ClosingPrice>)],
        errors: &mut Vec<ItemError>,
    ) -> Result<Vec<PriceQuote>> {
        let mut quotes = Vec::new();
        for (ticker, series) in histories {
            if let Err(e) = validation::validate_ticker(ticker) {
                errors.push(ItemError::new(ticker.clone(), &e));
                continue;
            }

            match pricing::compute_quote(ticker, series) {
                Ok(quote) => quotes.push(quote),
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping {}: {}", ticker, e);
                    errors.push(ItemError::new(ticker.clone(), &e));
                }
                Err(e) => return Err(e).context("Price computation failed"),
            }
        }
        Ok(quotes)
    }
}

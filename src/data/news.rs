use super::{Article, BriefError, BriefResult};

pub struct NewsClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl NewsClient {
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

    /// Fetch the top business headlines, capped to `limit` articles
    pub async fn fetch_top_headlines(&self, limit: usize) -> BriefResult<Vec<Article>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| BriefError::Config("NewsAPI key not configured".to_string()))?;

        tracing::info!("Fetching top business headlines (limit: {})", limit);

        let url = format!(
            "https://newsapi.org/v2/top-headlines?category=business&language=en&pageSize={}&apiKey={}",
            limit, api_key
        );

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BriefError::Api {
                status_code: status.as_u16(),
                message: format!("NewsAPI error: {}", error_text),
            });
        }

        let response_json: serde_json::Value = response.json().await?;

        let raw_articles = response_json["articles"]
            .as_array()
            .ok_or_else(|| BriefError::parse_error("No articles array in response"))?;

        let mut articles = Vec::new();
        for raw in raw_articles.iter().take(limit) {
            // Removed articles come back with a null title; skip them
            let title = match raw["title"].as_str() {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => continue,
            };
            let url = raw["url"].as_str().unwrap_or("").to_string();
            articles.push(Article { title, url });
        }

        tracing::info!("Fetched {} headlines from NewsAPI", articles.len());
        Ok(articles)
    }
}

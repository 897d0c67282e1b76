use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::config::company_keywords;
use crate::sources::types::{Domain, ItemProvider, RawItem};

/// Headline provider backed by a newsapi.org-style JSON endpoint.
/// Unconfigured (no api key) behaves exactly like a transient failure.
pub struct NewsApiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    source: Option<ArticleSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

impl NewsApiProvider {
    pub fn new(client: reqwest::Client, api_key: Option<String>, page_size: usize) -> Self {
        Self {
            client,
            api_key,
            page_size,
        }
    }

    fn build_query(symbol: &str, display_name: Option<&str>) -> String {
        match company_keywords(symbol) {
            Some((name, keywords)) => {
                format!("{symbol} OR {name} OR {}", keywords.join(" OR "))
            }
            None => {
                let name = display_name.unwrap_or(symbol);
                format!("{symbol} OR {name} OR stock market OR financial")
            }
        }
    }
}

#[async_trait]
impl ItemProvider for NewsApiProvider {
    async fn fetch(&self, symbol: &str, display_name: Option<&str>) -> Result<Vec<RawItem>> {
        let Some(key) = self.api_key.as_deref() else {
            bail!("news api key not configured");
        };

        let query = Self::build_query(symbol, display_name);
        let page_size = self.page_size.to_string();
        let since = (Utc::now() - Duration::days(7)).to_rfc3339();
        let resp = self
            .client
            .get("https://newsapi.org/v2/everything")
            .query(&[
                ("q", query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("from", since.as_str()),
                ("apiKey", key),
            ])
            .send()
            .await
            .context("news http get")?
            .error_for_status()
            .context("news http status")?
            .json::<EverythingResponse>()
            .await
            .context("news json decode")?;

        let items = resp
            .articles
            .into_iter()
            .take(self.page_size)
            .filter_map(|a| {
                let title = a.title.unwrap_or_default();
                let body = a.description.unwrap_or_default();
                if title.trim().is_empty() && body.trim().is_empty() {
                    return None;
                }
                Some(RawItem {
                    title: html_escape::decode_html_entities(&title).to_string(),
                    body: html_escape::decode_html_entities(&body).to_string(),
                    source: a
                        .source
                        .and_then(|s| s.name)
                        .unwrap_or_else(|| "Unknown".to_string()),
                    published_at: a.published_at.unwrap_or_else(Utc::now),
                    engagement_weight: None,
                })
            })
            .collect();

        Ok(items)
    }

    fn domain(&self) -> Domain {
        Domain::News
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_symbol_expands_keywords() {
        let q = NewsApiProvider::build_query("AAPL", None);
        assert!(q.contains("AAPL"));
        assert!(q.contains("Apple"));
        assert!(q.contains(" OR "));
    }

    #[test]
    fn unknown_symbol_falls_back_to_generic_query() {
        let q = NewsApiProvider::build_query("ZZZZ", Some("Zeta Corp"));
        assert!(q.contains("ZZZZ"));
        assert!(q.contains("Zeta Corp"));
        assert!(q.contains("stock market"));
    }

    #[tokio::test]
    async fn missing_key_errors_like_transient_failure() {
        let p = NewsApiProvider::new(reqwest::Client::new(), None, 30);
        assert!(p.fetch("AAPL", None).await.is_err());
    }
}

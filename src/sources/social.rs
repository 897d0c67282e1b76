use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::company_keywords;
use crate::sources::types::{Domain, ItemProvider, RawItem};

const SUBREDDITS: &[&str] = &[
    "stocks",
    "investing",
    "SecurityAnalysis",
    "financialindependence",
    "StockMarket",
];
const POSTS_PER_SEARCH: usize = 5;

/// Social provider over public subreddit search feeds. Requires a
/// configured user agent; without one it fails like any other outage.
pub struct RedditProvider {
    client: reqwest::Client,
    user_agent: Option<String>,
    max_posts: usize,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: Option<String>,
    selftext: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    created_utc: f64,
    subreddit: Option<String>,
}

impl RedditProvider {
    pub fn new(client: reqwest::Client, user_agent: Option<String>, max_posts: usize) -> Self {
        Self {
            client,
            user_agent,
            max_posts,
        }
    }

    fn search_terms(symbol: &str) -> Vec<String> {
        let mut terms = vec![symbol.to_string()];
        if let Some((name, _)) = company_keywords(symbol) {
            if let Some(first) = name.split_whitespace().next() {
                terms.push(first.to_string());
            }
        }
        terms
    }
}

#[async_trait]
impl ItemProvider for RedditProvider {
    async fn fetch(&self, symbol: &str, _display_name: Option<&str>) -> Result<Vec<RawItem>> {
        let Some(agent) = self.user_agent.as_deref() else {
            bail!("reddit user agent not configured");
        };

        let terms = Self::search_terms(symbol);
        let mut items: Vec<RawItem> = Vec::new();

        for &sub in SUBREDDITS {
            for term in &terms {
                let url = format!("https://www.reddit.com/r/{sub}/search.json");
                let limit = POSTS_PER_SEARCH.to_string();
                let result = self
                    .client
                    .get(&url)
                    .header(reqwest::header::USER_AGENT, agent)
                    .query(&[
                        ("q", term.as_str()),
                        ("restrict_sr", "1"),
                        ("t", "week"),
                        ("limit", limit.as_str()),
                    ])
                    .send()
                    .await
                    .and_then(|r| r.error_for_status());

                let listing = match result {
                    Ok(resp) => resp.json::<Listing>().await.context("reddit json decode"),
                    Err(e) => Err(e).context("reddit http get"),
                };

                // One bad subreddit must not sink the rest of the sweep.
                let listing = match listing {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::warn!(error = ?e, subreddit = sub, "subreddit search failed");
                        continue;
                    }
                };

                for child in listing.data.children {
                    let post = child.data;
                    let published_at = DateTime::<Utc>::from_timestamp(
                        post.created_utc as i64,
                        0,
                    )
                    .unwrap_or_else(Utc::now);
                    items.push(RawItem {
                        title: post.title.unwrap_or_default(),
                        body: post.selftext.unwrap_or_default(),
                        source: format!(
                            "r/{}",
                            post.subreddit.as_deref().unwrap_or(sub)
                        ),
                        published_at,
                        engagement_weight: Some(post.score.max(0) as f64),
                    });
                }

                if items.len() >= self.max_posts {
                    items.truncate(self.max_posts);
                    return Ok(items);
                }
            }
        }

        Ok(items)
    }

    fn domain(&self) -> Domain {
        Domain::Social
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}

//! Engine configuration: credentials and tunables from the environment,
//! plus the built-in company keyword map used to build search queries.

use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Deserialize;

const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_FETCH_LIMIT: usize = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORPUS_PATH: &str = "data/market_sentiment.csv";

/// Runtime configuration for the sentiment service. Every credential is
/// optional; a missing one simply routes that provider down the fallback
/// path.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub news_api_key: Option<String>,
    #[serde(default)]
    pub reddit_user_agent: Option<String>,
    #[serde(default)]
    pub fred_api_key: Option<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    /// Pin for tests and reproducible demos; `None` seeds from the OS.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
fn default_fetch_limit() -> usize {
    DEFAULT_FETCH_LIMIT
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_corpus_path() -> String {
    DEFAULT_CORPUS_PATH.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            news_api_key: None,
            reddit_user_agent: None,
            fred_api_key: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            corpus_path: DEFAULT_CORPUS_PATH.to_string(),
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the environment. Empty values count as
    /// unset so a blank `.env` line does not look like a credential.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        Self {
            news_api_key: var("NEWS_API_KEY"),
            reddit_user_agent: var("REDDIT_USER_AGENT"),
            fred_api_key: var("FRED_API_KEY"),
            cache_ttl_secs: var("SENTIMENT_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            fetch_limit: var("SENTIMENT_FETCH_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FETCH_LIMIT),
            request_timeout_secs: var("SENTIMENT_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            corpus_path: var("SENTIMENT_CORPUS_PATH")
                .unwrap_or_else(|| DEFAULT_CORPUS_PATH.to_string()),
            rng_seed: var("SENTIMENT_RNG_SEED").and_then(|v| v.parse().ok()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Built-in seed of well-covered tickers: display name + search keywords.
static COMPANY_MAP: Lazy<HashMap<&'static str, (&'static str, Vec<&'static str>)>> =
    Lazy::new(|| {
        let mut m = HashMap::new();
        for (symbol, name, keywords) in [
            ("AAPL", "Apple Inc", vec!["Apple", "iPhone", "iPad", "Mac", "iOS"]),
            ("GOOGL", "Google", vec!["Google", "Alphabet", "YouTube", "Android", "Search"]),
            ("MSFT", "Microsoft", vec!["Microsoft", "Windows", "Azure", "Office", "Xbox"]),
            ("TSLA", "Tesla", vec!["Tesla", "Elon Musk", "electric vehicle", "EV", "SpaceX"]),
            ("AMZN", "Amazon", vec!["Amazon", "AWS", "Prime", "e-commerce", "Jeff Bezos"]),
            ("NVDA", "NVIDIA", vec!["NVIDIA", "GPU", "AI chips", "gaming", "datacenter"]),
            ("META", "Meta", vec!["Meta", "Facebook", "Instagram", "WhatsApp", "VR"]),
            ("NFLX", "Netflix", vec!["Netflix", "streaming", "content", "subscription"]),
            ("JPM", "JPMorgan Chase", vec!["JPMorgan", "banking", "financial services"]),
            ("V", "Visa", vec!["Visa", "payments", "credit card", "fintech"]),
        ] {
            m.insert(symbol, (name, keywords));
        }
        m
    });

/// Display name and search keywords for a known symbol.
pub fn company_keywords(symbol: &str) -> Option<(&'static str, &'static [&'static str])> {
    COMPANY_MAP
        .get(symbol.to_ascii_uppercase().as_str())
        .map(|(name, kws)| (*name, kws.as_slice()))
}

/// Display name for a known symbol.
pub fn company_name(symbol: &str) -> Option<&'static str> {
    company_keywords(symbol).map(|(name, _)| name)
}

/// Symbols in the built-in map, for listing-style consumers.
pub fn known_symbols() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = COMPANY_MAP.keys().copied().collect();
    v.sort_unstable();
    v
}

//! # Sentiment Service
//! Process-wide facade over the aggregation pipeline: providers +
//! classifier + composite cache + corpus-backed trend series.
//! `get_recommendation` is the single externally meaningful read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::cache::CompositeCache;
use crate::classifier::SentimentClassifier;
use crate::compose::{compose, CompositeSentiment};
use crate::config::{company_name, EngineConfig};
use crate::corpus::Corpus;
use crate::engine::{recommend, Components, Recommendation};
use crate::sources::economic::FredProvider;
use crate::sources::news::NewsApiProvider;
use crate::sources::social::RedditProvider;
use crate::sources::types::{
    Domain, DomainScore, EconomicIndicator, IndicatorProvider, ItemProvider,
};
use crate::sources::{aggregate_economic, aggregate_items};
use crate::trend::{direction, trend_series, TrendDirection, TrendPoint};

/// Trend window used to derive the direction feeding the recommendation.
const RECOMMENDATION_TREND_DAYS: usize = 7;

pub struct SentimentService {
    classifier: Arc<SentimentClassifier>,
    news: Arc<dyn ItemProvider>,
    social: Arc<dyn ItemProvider>,
    economic: Arc<dyn IndicatorProvider>,
    cache: CompositeCache,
    corpus: Option<Corpus>,
    /// Root randomness source; aggregation calls derive child rngs from it
    /// so a pinned seed makes the whole pipeline reproducible.
    rng: Mutex<StdRng>,
    /// Most recent aggregation outputs, kept for display consumers.
    last_scores: RwLock<HashMap<Domain, DomainScore>>,
    last_indicators: RwLock<Vec<EconomicIndicator>>,
}

impl SentimentService {
    /// Wire the real providers from configuration. The corpus is optional:
    /// a missing file only disables training and the trend history.
    pub fn from_config(config: EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .expect("http client");

        let news = Arc::new(NewsApiProvider::new(
            client.clone(),
            config.news_api_key.clone(),
            config.fetch_limit,
        ));
        let social = Arc::new(RedditProvider::new(
            client.clone(),
            config.reddit_user_agent.clone(),
            config.fetch_limit,
        ));
        let economic = Arc::new(FredProvider::new(client, config.fred_api_key.clone()));

        let corpus = match Corpus::load_from_file(&config.corpus_path) {
            Ok(c) if !c.is_empty() => Some(c),
            Ok(_) => {
                tracing::warn!(path = %config.corpus_path, "corpus file is empty");
                None
            }
            Err(e) => {
                tracing::warn!(error = ?e, path = %config.corpus_path, "corpus unavailable");
                None
            }
        };

        Self::assemble(config, news, social, economic, corpus)
    }

    /// Inject providers directly; used by tests and embedding callers.
    pub fn with_providers(
        config: EngineConfig,
        news: Arc<dyn ItemProvider>,
        social: Arc<dyn ItemProvider>,
        economic: Arc<dyn IndicatorProvider>,
        corpus: Option<Corpus>,
    ) -> Self {
        Self::assemble(config, news, social, economic, corpus)
    }

    fn assemble(
        config: EngineConfig,
        news: Arc<dyn ItemProvider>,
        social: Arc<dyn ItemProvider>,
        economic: Arc<dyn IndicatorProvider>,
        corpus: Option<Corpus>,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            classifier: Arc::new(SentimentClassifier::new()),
            news,
            social,
            economic,
            cache: CompositeCache::new(config.cache_ttl()),
            corpus,
            rng: Mutex::new(rng),
            last_scores: RwLock::new(HashMap::new()),
            last_indicators: RwLock::new(Vec::new()),
        }
    }

    /// Derive a child rng without holding the root lock across awaits.
    fn child_rng(&self) -> StdRng {
        let mut root = self.rng.lock().expect("rng mutex poisoned");
        StdRng::seed_from_u64(root.next_u64())
    }

    /// The cached composite view, refreshed at most once per TTL window.
    pub async fn current_sentiment(&self, symbol: &str) -> Result<CompositeSentiment> {
        self.cache
            .get_or_refresh(|| self.refresh_composite(symbol))
            .await
    }

    async fn refresh_composite(&self, symbol: &str) -> Result<CompositeSentiment> {
        let display_name = company_name(symbol);
        tracing::debug!(symbol, "refreshing composite sentiment");

        let mut news_rng = self.child_rng();
        let mut social_rng = self.child_rng();
        let mut econ_rng = self.child_rng();

        let (news, social, econ) = tokio::join!(
            aggregate_items(
                &*self.news,
                &self.classifier,
                symbol,
                display_name,
                &mut news_rng
            ),
            aggregate_items(
                &*self.social,
                &self.classifier,
                symbol,
                display_name,
                &mut social_rng
            ),
            aggregate_economic(&*self.economic, &mut econ_rng),
        );

        let composite = compose(news.value, social.value, econ.score.value, Utc::now());

        {
            let mut scores = self.last_scores.write().expect("scores rwlock poisoned");
            scores.insert(Domain::News, news);
            scores.insert(Domain::Social, social);
            scores.insert(Domain::Economic, econ.score);
        }
        *self
            .last_indicators
            .write()
            .expect("indicators rwlock poisoned") = econ.indicators;

        Ok(composite)
    }

    /// The one externally meaningful read: composite sentiment + short-term
    /// trend direction mapped through the decision table.
    pub async fn get_recommendation(&self, symbol: &str) -> Result<Recommendation> {
        let sentiment = self.current_sentiment(symbol).await?;
        let trend = self.sentiment_trend(RECOMMENDATION_TREND_DAYS);
        let dir = direction(&trend);

        Ok(recommend(
            sentiment.overall,
            dir,
            Components {
                news: sentiment.news,
                social: sentiment.social,
                economic: sentiment.economic,
            },
        ))
    }

    /// Display series over the trailing `window_days`; empty without a
    /// corpus, which the direction calculation treats as Flat.
    pub fn sentiment_trend(&self, window_days: usize) -> Vec<TrendPoint> {
        let Some(corpus) = &self.corpus else {
            return Vec::new();
        };
        let daily = corpus.daily_sentiment();
        let mut rng = self.child_rng();
        trend_series(&daily, window_days, &mut rng)
    }

    /// Current short-window direction (diagnostic convenience).
    pub fn trend_direction(&self) -> TrendDirection {
        direction(&self.sentiment_trend(RECOMMENDATION_TREND_DAYS))
    }

    /// Train the classifier ensemble from the corpus on a blocking worker.
    /// Failure is logged and leaves the lexical fallback in place.
    pub async fn train_classifier(&self) -> Result<f64> {
        let Some(corpus) = &self.corpus else {
            anyhow::bail!("no corpus available for training");
        };
        let samples = corpus.training_samples();
        let classifier = self.classifier.clone();

        let outcome =
            tokio::task::spawn_blocking(move || classifier.train_from(&samples)).await?;
        if let Err(e) = &outcome {
            tracing::warn!(error = ?e, "classifier training failed; lexical fallback stays active");
        }
        outcome
    }

    pub fn is_classifier_trained(&self) -> bool {
        self.classifier.is_trained()
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Manual cache invalidation: the next read recomputes.
    pub async fn invalidate_cache(&self) {
        self.cache.clear().await;
        tracing::info!("composite sentiment cache cleared");
    }

    /// Most recent scored items for a domain (provenance for display).
    pub fn latest_items(&self, domain: Domain) -> Option<DomainScore> {
        self.last_scores
            .read()
            .expect("scores rwlock poisoned")
            .get(&domain)
            .cloned()
    }

    /// Most recent indicator snapshot.
    pub fn latest_indicators(&self) -> Vec<EconomicIndicator> {
        self.last_indicators
            .read()
            .expect("indicators rwlock poisoned")
            .clone()
    }
}

// src/sources/mod.rs
pub mod economic;
pub mod news;
pub mod social;
pub mod synthetic;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use rand::Rng;

use crate::classifier::SentimentClassifier;
use crate::lexicon::label_for;
use crate::sources::types::{
    Domain, DomainScore, EconomicIndicator, IndicatorProvider, ItemProvider, RawItem, ScoredItem,
};

/// One-time metrics registration (so series show up before the first
/// increment).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "sentiment_items_scored_total",
            "Items scored across all domain aggregations."
        );
        describe_counter!(
            "sentiment_provider_errors_total",
            "Provider fetch errors (incl. unconfigured credentials)."
        );
        describe_counter!(
            "sentiment_fallback_total",
            "Aggregations that served a synthetic or neutral-band fallback."
        );
        describe_gauge!(
            "sentiment_aggregate_last_run_ts",
            "Unix ts of the last domain aggregation."
        );
    });
}

/// Randomized neutral bands per domain; intentionally distinct and
/// intentionally not derived from the affine rescale.
fn fallback_band(domain: Domain) -> (f64, f64) {
    match domain {
        Domain::News => (2.5, 3.5),
        Domain::Social => (2.6, 3.4),
        Domain::Economic => (2.5, 3.5),
    }
}

fn fallback_value<R: Rng + ?Sized>(domain: Domain, rng: &mut R) -> f64 {
    let (lo, hi) = fallback_band(domain);
    round2(rng.random_range(lo..hi))
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// News/social rescale from mean polarity in [-1, 1] onto [2, 5].
fn rescale_polarity(avg: f64) -> f64 {
    (((avg + 1.0) / 2.0) * 3.0 + 2.0).clamp(2.0, 5.0)
}

/// Engagement weight clamped to [1, 10] and scaled down to [0.1, 1.0].
fn engagement_factor(item: &RawItem) -> f64 {
    item.engagement_weight.unwrap_or(1.0).clamp(1.0, 10.0) / 10.0
}

/// Score each item's combined text; items that are blank after trimming
/// are dropped.
pub fn score_items(classifier: &SentimentClassifier, items: Vec<RawItem>) -> Vec<ScoredItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let text = item.full_text();
            if text.trim().is_empty() {
                return None;
            }
            let polarity = classifier.polarity(&text);
            Some(ScoredItem {
                item,
                polarity,
                label: label_for(polarity),
            })
        })
        .collect()
}

fn reduce_scored(domain: Domain, scored: &[ScoredItem]) -> Option<f64> {
    if scored.is_empty() {
        return None;
    }
    let avg = match domain {
        Domain::News => {
            scored.iter().map(|s| s.polarity).sum::<f64>() / scored.len() as f64
        }
        Domain::Social => {
            scored
                .iter()
                .map(|s| s.polarity * engagement_factor(&s.item))
                .sum::<f64>()
                / scored.len() as f64
        }
        Domain::Economic => return None,
    };
    Some(round2(rescale_polarity(avg)))
}

/// Aggregate one item-based domain (news or social) to a DomainScore.
/// Never fails: provider errors and empty results degrade to a synthetic
/// item set, and a still-empty score degrades to the neutral band.
pub async fn aggregate_items<R: Rng + ?Sized>(
    provider: &dyn ItemProvider,
    classifier: &SentimentClassifier,
    symbol: &str,
    display_name: Option<&str>,
    rng: &mut R,
) -> DomainScore {
    ensure_metrics_described();
    let domain = provider.domain();

    let fetched = match provider.fetch(symbol, display_name).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), domain = domain.as_str(), "provider fetch failed");
            counter!("sentiment_provider_errors_total").increment(1);
            Vec::new()
        }
    };

    let items = if fetched.is_empty() {
        counter!("sentiment_fallback_total").increment(1);
        let name = display_name.unwrap_or(symbol);
        match domain {
            Domain::News => synthetic::synthetic_news(rng, symbol, name),
            Domain::Social => synthetic::synthetic_social(rng, symbol, name),
            Domain::Economic => Vec::new(),
        }
    } else {
        fetched
    };

    let scored = score_items(classifier, items);
    counter!("sentiment_items_scored_total").increment(scored.len() as u64);
    gauge!("sentiment_aggregate_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    let value = match reduce_scored(domain, &scored) {
        Some(v) => v,
        None => {
            counter!("sentiment_fallback_total").increment(1);
            fallback_value(domain, rng)
        }
    };

    DomainScore {
        domain,
        value,
        sample_count: scored.len(),
        items: scored,
    }
}

/// Economic aggregation result: the domain score plus the indicator
/// snapshot it was derived from (reported separately for display).
#[derive(Debug, Clone)]
pub struct EconomicAggregate {
    pub score: DomainScore,
    pub indicators: Vec<EconomicIndicator>,
}

/// Aggregate the economic domain from indicator trends. Total provider
/// failure substitutes the synthetic indicator snapshot; an empty snapshot
/// degrades to the neutral band.
pub async fn aggregate_economic<R: Rng + ?Sized>(
    provider: &dyn IndicatorProvider,
    rng: &mut R,
) -> EconomicAggregate {
    ensure_metrics_described();

    let indicators = match provider.fetch().await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), "indicator fetch failed");
            counter!("sentiment_provider_errors_total").increment(1);
            counter!("sentiment_fallback_total").increment(1);
            synthetic::synthetic_indicators()
        }
    };

    let value = if indicators.is_empty() {
        counter!("sentiment_fallback_total").increment(1);
        fallback_value(Domain::Economic, rng)
    } else {
        let favorable: f64 = indicators.iter().map(|i| i.favorable_points()).sum();
        let ratio = favorable / indicators.len() as f64;
        let jitter = rng.random_range(-0.2..0.2);
        round2((ratio * 3.0 + 2.0 + jitter).clamp(2.0, 5.0))
    };

    gauge!("sentiment_aggregate_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    EconomicAggregate {
        score: DomainScore {
            domain: Domain::Economic,
            value,
            sample_count: indicators.len(),
            items: Vec::new(),
        },
        indicators,
    }
}

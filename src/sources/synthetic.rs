//! Synthetic item generation for degraded fetches.
//!
//! When a provider is unconfigured or fails, the aggregators substitute a
//! randomized-but-plausible item set spanning positive/negative/neutral
//! flavors, so repeated empty-data calls do not return identical values.

use chrono::{Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::sources::types::{EconomicIndicator, RawItem};

const POSITIVE_HEADLINES: &[&str] = &[
    "{name} rallies on strong earnings beat",
    "{name} announces innovative product launch",
    "{name} stock reaches new yearly high",
    "Analysts upgrade {name} on robust growth",
    "{name} shows resilient momentum this quarter",
];

const NEGATIVE_HEADLINES: &[&str] = &[
    "{name} faces regulatory scrutiny",
    "{name} stock declines on weak guidance",
    "Supply disruptions weigh on {name}",
    "{name} executive departure raises concerns",
    "{name} slides as selloff deepens",
];

const NEUTRAL_HEADLINES: &[&str] = &[
    "{name} quarterly earnings meet expectations",
    "{name} maintains current market position",
    "{name} awaits regulatory decision",
    "{name} stock trades in narrow range",
    "Investors monitor {name} developments",
];

const POSITIVE_BODY: &str =
    "Conditions show promising momentum with strong fundamentals supporting further gains.";
const NEGATIVE_BODY: &str =
    "Challenging conditions and mounting uncertainty weigh on the outlook for investors.";
const NEUTRAL_BODY: &str =
    "Market participants are monitoring developments for clearer directional signals.";

const NEWS_OUTLETS: &[&str] = &["Financial Times", "Bloomberg", "Reuters", "WSJ"];

const BULLISH_POSTS: &[(&str, &str)] = &[
    ("{sym} looking bullish today", "Indicators pointing up, strong momentum on {name}."),
    ("Loading up on {sym}", "Fundamentals are solid and the rally has room to run."),
    ("{sym} breaking out", "Chart looks great, upgraded targets across the board."),
    ("Best quarter yet for {sym}", "{name} keeps delivering, staying long."),
];

const BEARISH_POSTS: &[(&str, &str)] = &[
    ("{sym} overvalued here", "Valuation is getting scary, taking profits on {name}."),
    ("Red flags on {sym}", "Weak indicators, moving to defensive positions."),
    ("Selling my {sym} position", "Risk reward not favorable anymore, fears of a correction."),
    ("{sym} volatility is brutal", "Too much uncertainty to stay long {name}."),
];

const NEUTRAL_POSTS: &[(&str, &str)] = &[
    ("Mixed signals from {sym}", "Some good, some bad in the {name} report, waiting it out."),
    ("{sym} consolidation continues", "No clear direction yet, patience is key."),
    ("Holding {sym} steady", "Neither buying nor selling until signals clear up."),
    ("{sym} range bound", "Support and resistance both holding for {name}."),
];

const SUBREDDITS: &[&str] = &["stocks", "investing", "SecurityAnalysis", "StockMarket"];

fn fill(template: &str, symbol: &str, name: &str) -> String {
    template.replace("{sym}", symbol).replace("{name}", name)
}

/// Mock news articles: a random sample across the three flavors.
pub fn synthetic_news<R: Rng + ?Sized>(rng: &mut R, symbol: &str, name: &str) -> Vec<RawItem> {
    let mut pool: Vec<(&str, &str)> = Vec::new();
    pool.extend(POSITIVE_HEADLINES.iter().map(|h| (*h, POSITIVE_BODY)));
    pool.extend(NEGATIVE_HEADLINES.iter().map(|h| (*h, NEGATIVE_BODY)));
    pool.extend(NEUTRAL_HEADLINES.iter().map(|h| (*h, NEUTRAL_BODY)));

    let count = 5.min(pool.len());
    let picks: Vec<(&str, &str)> = pool.choose_multiple(rng, count).cloned().collect();

    let now = Utc::now();
    picks
        .into_iter()
        .enumerate()
        .map(|(i, (headline, body))| RawItem {
            title: fill(headline, symbol, name),
            body: body.to_string(),
            source: NEWS_OUTLETS.choose(rng).unwrap_or(&"Reuters").to_string(),
            published_at: now - Duration::hours(2 * i as i64),
            engagement_weight: None,
        })
        .collect()
}

#[derive(Clone, Copy)]
enum PostFlavor {
    Bull,
    Bear,
    Neutral,
}

/// Mock social posts with engagement weights varied by flavor.
pub fn synthetic_social<R: Rng + ?Sized>(rng: &mut R, symbol: &str, name: &str) -> Vec<RawItem> {
    let mut pool: Vec<(&str, &str, PostFlavor)> = Vec::new();
    pool.extend(BULLISH_POSTS.iter().map(|(t, b)| (*t, *b, PostFlavor::Bull)));
    pool.extend(BEARISH_POSTS.iter().map(|(t, b)| (*t, *b, PostFlavor::Bear)));
    pool.extend(NEUTRAL_POSTS.iter().map(|(t, b)| (*t, *b, PostFlavor::Neutral)));

    let count = 8.min(pool.len());
    let picks: Vec<(&str, &str, PostFlavor)> =
        pool.choose_multiple(rng, count).cloned().collect();

    let now = Utc::now();
    picks
        .into_iter()
        .enumerate()
        .map(|(i, (title, body, flavor))| {
            let engagement = match flavor {
                PostFlavor::Bull => rng.random_range(20..=50),
                PostFlavor::Bear => rng.random_range(5..=25),
                PostFlavor::Neutral => rng.random_range(10..=30),
            };
            RawItem {
                title: fill(title, symbol, name),
                body: fill(body, symbol, name),
                source: format!("r/{}", SUBREDDITS.choose(rng).unwrap_or(&"stocks")),
                published_at: now - Duration::minutes(30 * i as i64),
                engagement_weight: Some(engagement as f64),
            }
        })
        .collect()
}

/// Mock indicator snapshot mirroring a typical healthy-economy print.
pub fn synthetic_indicators() -> Vec<EconomicIndicator> {
    vec![
        EconomicIndicator::new("GDP", 2.1, 2.0),
        EconomicIndicator::new("UNEMPLOYMENT", 3.8, 4.0),
        EconomicIndicator::new("INFLATION", 2.3, 2.5),
        EconomicIndicator::new("INTEREST_RATE", 5.25, 5.0),
        EconomicIndicator::new("CONSUMER_CONFIDENCE", 102.3, 101.8),
    ]
}

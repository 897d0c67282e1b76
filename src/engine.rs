//! # Recommendation Engine
//! Pure, testable logic that maps `(overall rating, trend direction,
//! component scores)` → `Recommendation`. No I/O, suitable for unit tests
//! and offline evaluation.
//!
//! Policy: rating bands (inclusive at their lower bound, checked from the
//! top) pick the action; the trend direction splits each band; confidence
//! grows linearly inside the band up to a per-cell cap. Component scores
//! outside the neutral corridor add qualitative callouts.

use serde::{Deserialize, Serialize};

use crate::trend::TrendDirection;

/// Graded trading action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
}

/// Per-domain component values cited alongside the action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub news: f64,
    pub social: f64,
    pub economic: f64,
}

/// The engine's final output. Produced fresh on every request; carries no
/// persisted identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub action: Action,
    /// Certainty in [0, 100], always an integer.
    pub confidence: u8,
    pub explanation: String,
    pub overall_rating: f64,
    pub components: Components,
}

/// Components below this are called out as weak/bearish/negative.
const COMPONENT_LOW: f64 = 2.3;
/// Components above this are called out as strong/bullish/positive.
const COMPONENT_HIGH: f64 = 3.7;

/// Map a composite rating, trend direction and component scores to a graded
/// recommendation. Total: out-of-range ratings are clamped, never rejected.
pub fn recommend(
    overall_rating: f64,
    trend: TrendDirection,
    components: Components,
) -> Recommendation {
    let rating = overall_rating.clamp(2.0, 5.0);

    let (action, confidence, mut explanation) = if rating >= 4.0 {
        match trend {
            TrendDirection::Up | TrendDirection::Flat => (
                Action::StrongBuy,
                (80.0 + (rating - 4.0) * 10.0).min(95.0),
                format!(
                    "Excellent sentiment across all indicators ({rating:.1}/5). Strong fundamentals with {}. High confidence investment opportunity.",
                    if trend == TrendDirection::Up { "positive momentum" } else { "stable conditions" }
                ),
            ),
            TrendDirection::Down => (
                Action::Buy,
                (70.0 + (rating - 4.0) * 10.0).min(85.0),
                format!(
                    "Strong positive sentiment ({rating:.1}/5) despite a recent downward trend. Fundamentals remain solid - a reasonable entry point for long-term positions."
                ),
            ),
        }
    } else if rating >= 3.5 {
        match trend {
            TrendDirection::Up => (
                Action::Buy,
                (65.0 + (rating - 3.5) * 20.0).min(80.0),
                format!(
                    "Positive sentiment ({rating:.1}/5) with upward momentum. Good growth potential with manageable risk."
                ),
            ),
            TrendDirection::Flat => (
                Action::Hold,
                (60.0 + (rating - 3.5) * 15.0).min(75.0),
                format!(
                    "Moderately positive sentiment ({rating:.1}/5) in a consolidation phase. Hold current positions and watch for a clear directional signal."
                ),
            ),
            TrendDirection::Down => (
                Action::Hold,
                (55.0 + (rating - 3.5) * 10.0).min(70.0),
                format!(
                    "Mixed signals: positive sentiment ({rating:.1}/5) against a declining trend. Wait for a reversal before adding exposure."
                ),
            ),
        }
    } else if rating >= 2.5 {
        match trend {
            TrendDirection::Up => (
                Action::Hold,
                (50.0 + (rating - 2.5) * 10.0).min(65.0),
                format!(
                    "Neutral sentiment ({rating:.1}/5) with an improving trend. Hold and watch for sustained improvement before adding."
                ),
            ),
            TrendDirection::Flat | TrendDirection::Down => (
                Action::Hold,
                (45.0 + (rating - 3.0).abs() * 10.0).min(60.0),
                format!(
                    "Neutral sentiment ({rating:.1}/5) with no clear direction. Maintain defensive positions until signals firm up."
                ),
            ),
        }
    } else {
        match trend {
            TrendDirection::Up => (
                Action::Hold,
                (55.0 + (2.5 - rating) * 10.0).min(70.0),
                format!(
                    "Negative sentiment ({rating:.1}/5) but showing signs of recovery. Wait for sustained improvement before buying."
                ),
            ),
            TrendDirection::Flat | TrendDirection::Down => (
                Action::Sell,
                (65.0 + (2.5 - rating) * 15.0).min(85.0),
                format!(
                    "Poor sentiment ({rating:.1}/5) with continuing weakness. Consider reducing exposure to limit downside risk."
                ),
            ),
        }
    };

    let callouts = component_callouts(&components);
    if !callouts.is_empty() {
        explanation.push_str(&format!(" Key factors: {}.", callouts.join(", ")));
    }

    Recommendation {
        action,
        confidence: confidence.round() as u8,
        explanation,
        overall_rating: rating,
        components,
    }
}

fn component_callouts(components: &Components) -> Vec<&'static str> {
    let mut out = Vec::new();

    if components.news < COMPONENT_LOW {
        out.push("negative news coverage");
    } else if components.news > COMPONENT_HIGH {
        out.push("positive news sentiment");
    }

    if components.social < COMPONENT_LOW {
        out.push("bearish social sentiment");
    } else if components.social > COMPONENT_HIGH {
        out.push("bullish social sentiment");
    }

    if components.economic < COMPONENT_LOW {
        out.push("weak economic indicators");
    } else if components.economic > COMPONENT_HIGH {
        out.push("strong economic backdrop");
    }

    out
}

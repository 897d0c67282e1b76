//! # Lexical Sentiment Scorer
//! Pretrained valence lexicon wrapped behind a compound-polarity contract:
//! `compound(text) -> f64` in [-1, 1], deterministic for fixed input.
//!
//! The threshold mapping to categorical labels lives here too; it is a core
//! contract shared by the classifier ensemble and the aggregators.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

/// Normalization constant for the compound score (sum / sqrt(sum^2 + ALPHA)).
const ALPHA: f64 = 15.0;

/// Categorical sentiment produced by the threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Stable index used by the classifier ensemble's probability vectors.
    pub fn index(self) -> usize {
        match self {
            SentimentLabel::Negative => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Positive => 2,
        }
    }

    pub fn from_index(i: usize) -> SentimentLabel {
        match i {
            0 => SentimentLabel::Negative,
            2 => SentimentLabel::Positive,
            _ => SentimentLabel::Neutral,
        }
    }
}

/// Map a polarity score in [-1, 1] to a categorical label.
/// Boundaries are inclusive toward the non-neutral class.
pub fn label_for(score: f64) -> SentimentLabel {
    if score <= -0.2 {
        SentimentLabel::Negative
    } else if score >= 0.2 {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_valence(&self, w: &str) -> f64 {
        *LEXICON.get(w).unwrap_or(&0.0)
    }

    /// Compound polarity in [-1, 1].
    ///
    /// Valences are summed per token; a negator within the previous 1..=3
    /// tokens inverts the sign of the hit. The raw sum is squashed through
    /// sum / sqrt(sum^2 + ALPHA).
    pub fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut sum = 0.0f64;

        for i in 0..tokens.len() {
            let base = self.word_valence(tokens[i].as_str());
            if base != 0.0 {
                let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
                sum += if negated { -base } else { base };
            }
        }

        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    }

    /// Label plus magnitude, the lexical fallback contract used by the
    /// untrained classifier ensemble.
    pub fn score(&self, text: &str) -> (SentimentLabel, f64) {
        let c = self.compound(text);
        (label_for(c), c.abs())
    }
}

/// Alphanumeric tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
    )
}

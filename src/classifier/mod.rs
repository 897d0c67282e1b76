//! # Trained Classifier Ensemble
//! Two-state machine: `Untrained` (initial) falls back to the lexical
//! scorer; `Trained` holds a fixed vocabulary plus two independently
//! trained models whose class-probability vectors are averaged.
//!
//! Training failure of any kind leaves the ensemble untrained; callers are
//! expected not to care which path served them.

pub mod naive_bayes;
pub mod softmax;
pub mod vectorizer;

use std::sync::RwLock;

use anyhow::{bail, Result};
use metrics::{describe_gauge, gauge};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::classifier::naive_bayes::{MultinomialNb, N_CLASSES};
use crate::classifier::softmax::SoftmaxRegression;
use crate::classifier::vectorizer::{tokenize, SparseVec, TermVectorizer};
use crate::lexicon::{label_for, LexiconScorer, SentimentLabel};

/// Vocabulary cap: top terms by corpus frequency.
const MAX_TERMS: usize = 5000;
/// Held-out fraction of the stratified split.
const TEST_FRACTION: f64 = 0.2;
/// Fixed seed so retraining on the same corpus reproduces the same split.
const SPLIT_SEED: u64 = 42;
/// Below this many samples per class the label distribution is degenerate.
const MIN_CLASS_SAMPLES: usize = 5;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_gauge!(
            "sentiment_train_accuracy",
            "Held-out ensemble accuracy from the last successful training run."
        );
    });
}

/// Categorical prediction with the ensemble's (or fallback's) certainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Vocabulary + models, built only by a successful training run.
#[derive(Debug)]
pub struct TrainedEnsemble {
    vectorizer: TermVectorizer,
    nb: MultinomialNb,
    softmax: SoftmaxRegression,
    pub holdout_accuracy: f64,
}

impl TrainedEnsemble {
    fn predict_proba(&self, document: &SparseVec) -> [f64; N_CLASSES] {
        let a = self.nb.predict_proba(document);
        let b = self.softmax.predict_proba(document);
        let mut avg = [0.0; N_CLASSES];
        for c in 0..N_CLASSES {
            avg[c] = (a[c] + b[c]) / 2.0;
        }
        avg
    }

    fn predict(&self, text: &str) -> Prediction {
        let doc = self.vectorizer.transform(&tokenize(text));
        let probs = self.predict_proba(&doc);
        let best = (0..N_CLASSES)
            .max_by(|&a, &b| probs[a].partial_cmp(&probs[b]).expect("finite probs"))
            .unwrap_or(SentimentLabel::Neutral.index());
        Prediction {
            label: SentimentLabel::from_index(best),
            confidence: probs[best],
        }
    }
}

enum EnsembleState {
    Untrained,
    Trained(TrainedEnsemble),
}

/// Process-wide sentiment scorer: lexical fallback plus the optional
/// trained ensemble. Cheap reads; the single state write happens when a
/// training run completes.
pub struct SentimentClassifier {
    lexicon: LexiconScorer,
    state: RwLock<EnsembleState>,
}

impl SentimentClassifier {
    pub fn new() -> Self {
        Self {
            lexicon: LexiconScorer::new(),
            state: RwLock::new(EnsembleState::Untrained),
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(
            *self.state.read().expect("classifier rwlock poisoned"),
            EnsembleState::Trained(_)
        )
    }

    /// Train both models on `(text, numeric sentiment)` samples; labels
    /// derive from the threshold rule. On success the state flips to
    /// `Trained` atomically and the held-out accuracy is returned. On any
    /// failure the state is left untouched.
    pub fn train_from(&self, samples: &[(String, f64)]) -> Result<f64> {
        let ensemble = train_ensemble(samples)?;
        let accuracy = ensemble.holdout_accuracy;

        ensure_metrics_described();
        gauge!("sentiment_train_accuracy").set(accuracy);
        tracing::info!(accuracy, samples = samples.len(), "classifier ensemble trained");

        *self.state.write().expect("classifier rwlock poisoned") =
            EnsembleState::Trained(ensemble);
        Ok(accuracy)
    }

    /// Categorical prediction. Untrained state falls back to the lexicon
    /// with confidence = |compound|.
    pub fn predict(&self, text: &str) -> Prediction {
        match &*self.state.read().expect("classifier rwlock poisoned") {
            EnsembleState::Untrained => {
                let (label, confidence) = self.lexicon.score(text);
                Prediction { label, confidence }
            }
            EnsembleState::Trained(ensemble) => ensemble.predict(text),
        }
    }

    /// Signed polarity in [-1, 1] for the aggregators: raw compound while
    /// untrained, signed confidence once trained.
    pub fn polarity(&self, text: &str) -> f64 {
        match &*self.state.read().expect("classifier rwlock poisoned") {
            EnsembleState::Untrained => self.lexicon.compound(text),
            EnsembleState::Trained(ensemble) => {
                let p = ensemble.predict(text);
                match p.label {
                    SentimentLabel::Positive => p.confidence,
                    SentimentLabel::Negative => -p.confidence,
                    SentimentLabel::Neutral => 0.0,
                }
            }
        }
    }

    pub fn lexicon(&self) -> &LexiconScorer {
        &self.lexicon
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn train_ensemble(samples: &[(String, f64)]) -> Result<TrainedEnsemble> {
    // Tokenize up front and drop samples that normalize to nothing.
    let mut docs: Vec<Vec<String>> = Vec::with_capacity(samples.len());
    let mut labels: Vec<usize> = Vec::with_capacity(samples.len());
    for (text, sentiment) in samples {
        let toks = tokenize(text);
        if toks.is_empty() {
            continue;
        }
        docs.push(toks);
        labels.push(label_for(*sentiment).index());
    }

    if docs.is_empty() {
        bail!("training corpus is empty after normalization");
    }

    let mut by_class: [Vec<usize>; N_CLASSES] = Default::default();
    for (i, &y) in labels.iter().enumerate() {
        by_class[y].push(i);
    }
    let present = by_class.iter().filter(|g| !g.is_empty()).count();
    if present < 2 {
        bail!("degenerate label distribution: {present} class(es) present");
    }
    for (c, group) in by_class.iter().enumerate() {
        if !group.is_empty() && group.len() < MIN_CLASS_SAMPLES {
            bail!(
                "degenerate label distribution: class {c} has only {} sample(s)",
                group.len()
            );
        }
    }

    // Stratified 80/20 split, seeded for reproducibility.
    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    let mut train_idx = Vec::new();
    let mut test_idx = Vec::new();
    for group in by_class.iter_mut() {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64 * TEST_FRACTION).round() as usize)
            .clamp(usize::from(!group.is_empty()), group.len().saturating_sub(1));
        test_idx.extend_from_slice(&group[..n_test]);
        train_idx.extend_from_slice(&group[n_test..]);
    }

    let train_docs: Vec<Vec<String>> = train_idx.iter().map(|&i| docs[i].clone()).collect();
    let vectorizer = TermVectorizer::fit(&train_docs, MAX_TERMS);
    if vectorizer.vocab_size() == 0 {
        bail!("empty vocabulary after stop-word filtering");
    }

    let train_x: Vec<SparseVec> = train_idx.iter().map(|&i| vectorizer.transform(&docs[i])).collect();
    let train_y: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();
    let test_x: Vec<SparseVec> = test_idx.iter().map(|&i| vectorizer.transform(&docs[i])).collect();
    let test_y: Vec<usize> = test_idx.iter().map(|&i| labels[i]).collect();

    let nb = MultinomialNb::fit(&train_x, &train_y, vectorizer.vocab_size());
    let mut softmax = SoftmaxRegression::default();
    softmax.fit(&train_x, &train_y, vectorizer.vocab_size());

    let mut ensemble = TrainedEnsemble {
        vectorizer,
        nb,
        softmax,
        holdout_accuracy: 0.0,
    };

    let correct = test_x
        .iter()
        .zip(&test_y)
        .filter(|(doc, &y)| {
            let p = ensemble.predict_proba(doc);
            let best = (0..N_CLASSES)
                .max_by(|&a, &b| p[a].partial_cmp(&p[b]).expect("finite probs"))
                .unwrap_or(0);
            best == y
        })
        .count();
    ensemble.holdout_accuracy = if test_y.is_empty() {
        0.0
    } else {
        correct as f64 / test_y.len() as f64
    };

    Ok(ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_corpus() -> Vec<(String, f64)> {
        let positive = [
            "stock rallies on strong earnings beat",
            "record profits and excellent growth outlook",
            "shares surge after upbeat guidance",
            "analysts upgrade on robust momentum",
            "impressive quarter with solid gains",
            "winner of the rally with strong upside",
        ];
        let negative = [
            "stock plunges on weak guidance",
            "heavy losses after terrible quarter",
            "shares crash amid fraud investigation",
            "downgrade on declining profits and fears",
            "worst selloff in years as panic spreads",
            "weak outlook with mounting losses",
        ];
        let neutral = [
            "company schedules annual shareholder meeting",
            "board appoints committee for the review",
            "quarterly report released on schedule",
            "company maintains existing product lineup",
            "shares trade in narrow range this week",
            "management provided routine operational update",
        ];

        let mut out = Vec::new();
        out.extend(positive.iter().map(|t| (t.to_string(), 0.6)));
        out.extend(negative.iter().map(|t| (t.to_string(), -0.6)));
        out.extend(neutral.iter().map(|t| (t.to_string(), 0.0)));
        out
    }

    #[test]
    fn untrained_matches_lexical_fallback_exactly() {
        let clf = SentimentClassifier::new();
        for text in [
            "strong growth and record profits",
            "stock plunges on weak guidance",
            "the meeting is on tuesday",
        ] {
            let p = clf.predict(text);
            let (label, conf) = clf.lexicon().score(text);
            assert_eq!(p.label, label);
            assert_eq!(p.confidence, conf);
            assert_eq!(clf.polarity(text), clf.lexicon().compound(text));
        }
    }

    #[test]
    fn training_transitions_state_and_reports_accuracy() {
        let clf = SentimentClassifier::new();
        assert!(!clf.is_trained());
        let acc = clf.train_from(&labeled_corpus()).expect("training succeeds");
        assert!(clf.is_trained());
        assert!((0.0..=1.0).contains(&acc));
    }

    #[test]
    fn trained_ensemble_classifies_held_in_phrases() {
        let clf = SentimentClassifier::new();
        clf.train_from(&labeled_corpus()).expect("training succeeds");

        let p = clf.predict("strong earnings rally with record profits");
        assert_eq!(p.label, SentimentLabel::Positive);
        assert!(p.confidence > 0.0 && p.confidence <= 1.0);

        let n = clf.predict("shares crash with heavy losses");
        assert_eq!(n.label, SentimentLabel::Negative);
    }

    #[test]
    fn degenerate_corpus_leaves_state_untrained() {
        let clf = SentimentClassifier::new();
        let single_class: Vec<(String, f64)> = (0..10)
            .map(|i| (format!("strong rally number {i}"), 0.8))
            .collect();
        assert!(clf.train_from(&single_class).is_err());
        assert!(!clf.is_trained());

        assert!(clf.train_from(&[]).is_err());
        assert!(!clf.is_trained());
    }

    #[test]
    fn trained_polarity_is_signed_confidence() {
        let clf = SentimentClassifier::new();
        clf.train_from(&labeled_corpus()).expect("training succeeds");
        let text = "record profits and strong gains";
        let p = clf.predict(text);
        let pol = clf.polarity(text);
        match p.label {
            SentimentLabel::Positive => assert_eq!(pol, p.confidence),
            SentimentLabel::Negative => assert_eq!(pol, -p.confidence),
            SentimentLabel::Neutral => assert_eq!(pol, 0.0),
        }
    }
}

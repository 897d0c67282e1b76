//! Multinomial naive Bayes over sparse term-count vectors.
//!
//! Log-space throughout; Laplace smoothing on term likelihoods. Probability
//! vectors are indexed by `SentimentLabel::index` (negative, neutral,
//! positive); classes absent from the training set keep probability zero.

use crate::classifier::vectorizer::SparseVec;

pub const N_CLASSES: usize = 3;

#[derive(Debug, Clone)]
pub struct MultinomialNb {
    /// ln P(class); `None` for classes with no training documents.
    class_log_prior: [Option<f64>; N_CLASSES],
    /// ln P(term | class), dense per class over the vocabulary.
    term_log_prob: Vec<Vec<f64>>,
    alpha: f64,
}

impl MultinomialNb {
    /// Fit on sparse documents and their label indices. `vocab_size` fixes
    /// the smoothing denominator even for terms unseen in a class.
    pub fn fit(documents: &[SparseVec], labels: &[usize], vocab_size: usize) -> Self {
        debug_assert_eq!(documents.len(), labels.len());
        let alpha = 1.0f64;

        let mut class_docs = [0usize; N_CLASSES];
        let mut term_counts = vec![vec![0.0f64; vocab_size]; N_CLASSES];
        let mut class_term_total = [0.0f64; N_CLASSES];

        for (doc, &y) in documents.iter().zip(labels) {
            class_docs[y] += 1;
            for &(idx, count) in doc {
                term_counts[y][idx] += count;
                class_term_total[y] += count;
            }
        }

        let total_docs = documents.len() as f64;
        let mut class_log_prior = [None; N_CLASSES];
        let mut term_log_prob = vec![vec![0.0f64; vocab_size]; N_CLASSES];

        for c in 0..N_CLASSES {
            if class_docs[c] == 0 {
                continue;
            }
            class_log_prior[c] = Some((class_docs[c] as f64 / total_docs).ln());
            let denom = class_term_total[c] + alpha * vocab_size as f64;
            for idx in 0..vocab_size {
                term_log_prob[c][idx] = ((term_counts[c][idx] + alpha) / denom).ln();
            }
        }

        Self {
            class_log_prior,
            term_log_prob,
            alpha,
        }
    }

    /// Class probabilities for one document, softmax-normalized over the
    /// classes seen in training.
    pub fn predict_proba(&self, document: &SparseVec) -> [f64; N_CLASSES] {
        let mut log_scores = [f64::NEG_INFINITY; N_CLASSES];
        for c in 0..N_CLASSES {
            let Some(prior) = self.class_log_prior[c] else {
                continue;
            };
            let mut s = prior;
            for &(idx, count) in document {
                s += count * self.term_log_prob[c][idx];
            }
            log_scores[c] = s;
        }

        let max = log_scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut probs = [0.0f64; N_CLASSES];
        if !max.is_finite() {
            return probs;
        }
        let mut sum = 0.0;
        for c in 0..N_CLASSES {
            if log_scores[c].is_finite() {
                probs[c] = (log_scores[c] - max).exp();
                sum += probs[c];
            }
        }
        for p in probs.iter_mut() {
            *p /= sum;
        }
        probs
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

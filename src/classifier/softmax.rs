//! Multinomial (softmax) logistic regression over sparse term-count
//! vectors, trained by per-sample gradient descent.
//!
//! Deterministic: fixed sample order, zero-initialized weights, early stop
//! on loss plateau.

use crate::classifier::naive_bayes::N_CLASSES;
use crate::classifier::vectorizer::SparseVec;

#[derive(Debug, Clone)]
pub struct SoftmaxRegression {
    /// Per-class weight vectors over the vocabulary.
    weights: Vec<Vec<f64>>,
    biases: [f64; N_CLASSES],
    learning_rate: f64,
    max_epochs: usize,
    tolerance: f64,
}

impl SoftmaxRegression {
    pub fn new(learning_rate: f64, max_epochs: usize, tolerance: f64) -> Self {
        Self {
            weights: Vec::new(),
            biases: [0.0; N_CLASSES],
            learning_rate,
            max_epochs,
            tolerance,
        }
    }

    fn softmax(logits: [f64; N_CLASSES]) -> [f64; N_CLASSES] {
        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut out = [0.0; N_CLASSES];
        let mut sum = 0.0;
        for c in 0..N_CLASSES {
            out[c] = (logits[c] - max).exp();
            sum += out[c];
        }
        for o in out.iter_mut() {
            *o /= sum;
        }
        out
    }

    fn logits(&self, document: &SparseVec) -> [f64; N_CLASSES] {
        let mut z = self.biases;
        for &(idx, count) in document {
            for c in 0..N_CLASSES {
                z[c] += self.weights[c][idx] * count;
            }
        }
        z
    }

    pub fn fit(&mut self, documents: &[SparseVec], labels: &[usize], vocab_size: usize) {
        debug_assert_eq!(documents.len(), labels.len());
        self.weights = vec![vec![0.0; vocab_size]; N_CLASSES];
        self.biases = [0.0; N_CLASSES];

        let n = documents.len().max(1) as f64;
        let mut prev_loss = f64::INFINITY;

        for epoch in 0..self.max_epochs {
            let mut loss = 0.0;
            for (doc, &y) in documents.iter().zip(labels) {
                let probs = Self::softmax(self.logits(doc));
                loss -= probs[y].max(1e-15).ln();

                for c in 0..N_CLASSES {
                    let err = probs[c] - if c == y { 1.0 } else { 0.0 };
                    self.biases[c] -= self.learning_rate * err;
                    for &(idx, count) in doc {
                        self.weights[c][idx] -= self.learning_rate * err * count;
                    }
                }
            }
            loss /= n;

            if (prev_loss - loss).abs() < self.tolerance {
                tracing::debug!(epoch, loss, "softmax regression converged");
                break;
            }
            prev_loss = loss;
        }
    }

    pub fn predict_proba(&self, document: &SparseVec) -> [f64; N_CLASSES] {
        Self::softmax(self.logits(document))
    }
}

impl Default for SoftmaxRegression {
    fn default() -> Self {
        Self::new(0.1, 100, 1e-5)
    }
}

//! Bag-of-terms vectorizer with a fixed, frequency-ranked vocabulary.
//!
//! The vocabulary is learned once at training time: top `max_terms` terms by
//! corpus frequency, standard English stop words excluded. Documents are
//! transformed into sparse `(term_index, count)` vectors; out-of-vocabulary
//! terms are dropped.

use std::collections::HashMap;

use crate::normalize::normalize;

/// Sparse document representation: `(vocabulary index, term count)`,
/// ascending by index.
pub type SparseVec = Vec<(usize, f64)>;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "myself", "nor", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself",
];

fn is_stop_word(tok: &str) -> bool {
    STOP_WORDS.binary_search(&tok).is_ok()
}

/// Tokenize already-raw text the way the scoring pipeline expects:
/// normalize, split on whitespace, keep tokens of length >= 2 that are not
/// stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|t| t.len() >= 2 && !is_stop_word(t))
        .map(|t| t.to_string())
        .collect()
}

#[derive(Debug, Clone)]
pub struct TermVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
}

impl TermVectorizer {
    /// Learn the vocabulary from tokenized documents: top `max_terms` terms
    /// by total corpus frequency, ties broken lexicographically for a
    /// deterministic vocabulary.
    pub fn fit(documents: &[Vec<String>], max_terms: usize) -> Self {
        let mut freq: HashMap<&str, u64> = HashMap::new();
        for doc in documents {
            for tok in doc {
                *freq.entry(tok.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, u64)> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_terms);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        Self { vocabulary, terms }
    }

    pub fn vocab_size(&self) -> usize {
        self.terms.len()
    }

    /// Transform a tokenized document into a sparse count vector.
    pub fn transform(&self, document: &[String]) -> SparseVec {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for tok in document {
            if let Some(&idx) = self.vocabulary.get(tok) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        let mut out: SparseVec = counts.into_iter().collect();
        out.sort_by_key(|(i, _)| *i);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_word_table_is_sorted() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS, "binary_search needs a sorted table");
    }

    #[test]
    fn tokenize_drops_stop_words_and_short_tokens() {
        let toks = tokenize("The stock is a winner, up 5%!");
        assert_eq!(toks, vec!["stock", "winner"]);
    }

    #[test]
    fn vocabulary_caps_at_max_terms_by_frequency() {
        let docs = vec![
            tokenize("apple apple apple banana banana cherry"),
            tokenize("apple banana date"),
        ];
        let v = TermVectorizer::fit(&docs, 2);
        assert_eq!(v.vocab_size(), 2);
        // apple (4) and banana (3) survive; cherry/date are cut.
        assert!(!v.transform(&tokenize("apple banana")).is_empty());
        assert!(v.transform(&tokenize("cherry date")).is_empty());
    }

    #[test]
    fn transform_counts_terms() {
        let docs = vec![tokenize("growth growth rally")];
        let v = TermVectorizer::fit(&docs, 100);
        let sv = v.transform(&tokenize("growth rally growth unknownterm"));
        let total: f64 = sv.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 3.0);
    }
}

//! TF-IDF feature encoder over unigrams and bigrams.
//!
//! The vocabulary is frozen by [`TfIdfEncoder::fit`]; [`TfIdfEncoder::transform`] maps any
//! text into that fixed feature space and silently drops out-of-vocabulary terms.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::EncoderConfig;
use crate::error::EncoderError;

/// English function words removed before n-grams are built.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "if", "in", "into", "is", "it", "its", "itself",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "which", "while", "whom", "why",
    "will", "with", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Sparse, L2-normalized feature vector. Entries are sorted by index.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(i, _)| i);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct TfIdfEncoder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_max: usize,
    stop_words: bool,
}

impl TfIdfEncoder {
    pub fn fit<S: AsRef<str>>(documents: &[S], config: &EncoderConfig) -> Result<Self, EncoderError> {
        if documents.is_empty() {
            return Err(EncoderError::EmptyTrainingSet);
        }

        let ngram_max = config.ngram_max.max(1);
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> =
                analyze(doc.as_ref(), ngram_max, config.stop_words).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration gives sorted terms, so indices are stable across runs.
        let kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= config.min_df)
            .collect();
        if kept.is_empty() {
            return Err(EncoderError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Ok(Self {
            vocabulary,
            idf,
            ngram_max,
            stop_words: config.stop_words,
        })
    }

    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in analyze(text, self.ngram_max, self.stop_words) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= norm;
            }
        }

        SparseVector::new(self.dimensions(), entries)
    }

    pub fn dimensions(&self) -> usize {
        self.idf.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

fn tokenize(text: &str, stop_words: bool) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| !stop_words || !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// Tokens followed by every n-gram up to `ngram_max`, space-joined.
fn analyze(text: &str, ngram_max: usize, stop_words: bool) -> Vec<String> {
    let tokens = tokenize(text, stop_words);
    let mut terms = tokens.clone();
    for n in 2..=ngram_max {
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}

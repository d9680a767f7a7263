use intentbot::config::EncoderConfig;
use intentbot::error::EncoderError;
use intentbot::model::TfIdfEncoder;

fn fit(docs: &[&str]) -> TfIdfEncoder {
    TfIdfEncoder::fit(docs, &EncoderConfig::default()).unwrap()
}

#[test]
fn test_empty_training_set_is_rejected() {
    let docs: Vec<&str> = Vec::new();
    let result = TfIdfEncoder::fit(&docs, &EncoderConfig::default());
    assert!(matches!(result, Err(EncoderError::EmptyTrainingSet)));
}

#[test]
fn test_stop_word_only_corpus_is_rejected() {
    let result = TfIdfEncoder::fit(&["the", "and of the", "a"], &EncoderConfig::default());
    assert!(matches!(result, Err(EncoderError::EmptyVocabulary)));
}

#[test]
fn test_vocabulary_has_unigrams_and_bigrams() {
    let encoder = fit(&["open a savings account", "close my account"]);

    assert!(encoder.contains_term("savings"));
    assert!(encoder.contains_term("savings account"));
    assert!(encoder.contains_term("close account"));
    assert!(!encoder.contains_term("my"), "stop words never enter the vocabulary");
    // open, savings, account, close, open savings, savings account, close account
    assert_eq!(encoder.dimensions(), 7);
}

#[test]
fn test_unknown_terms_are_ignored() {
    let encoder = fit(&["read files from disk", "run shell commands"]);
    let vector = encoder.transform("xyzzy quantum blockchain");

    assert!(vector.is_zero());
    assert_eq!(vector.dim(), encoder.dimensions(), "feature space is fixed regardless of input");
}

#[test]
fn test_vectors_are_unit_length() {
    let encoder = fit(&["read files from disk", "run shell commands"]);
    let vector = encoder.transform("read the files and run commands");
    assert!((vector.norm() - 1.0).abs() < 1e-9);
}

#[test]
fn test_rare_terms_weigh_more() {
    let encoder = fit(&["apple banana", "apple cherry", "apple durian"]);
    let vector = encoder.transform("apple cherry");

    let weights: Vec<f64> = vector.entries().iter().map(|(_, w)| *w).collect();
    assert_eq!(weights.len(), 3, "apple, cherry and the bigram");
    let max = weights.iter().cloned().fold(f64::MIN, f64::max);
    let min = weights.iter().cloned().fold(f64::MAX, f64::min);
    assert!(max > min, "apple appears in every document and must weigh less than cherry");
}

#[test]
fn test_transform_is_deterministic() {
    let encoder = fit(&["hello world", "goodbye world"]);
    assert_eq!(encoder.transform("hello world"), encoder.transform("hello world"));
}

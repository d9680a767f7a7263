use intentbot::config::{ClassifierConfig, EncoderConfig};
use intentbot::error::{ClassifierError, ClassifyError};
use intentbot::intent::{Intent, IntentCorpus};
use intentbot::model::{IntentPredictor, LogisticRegression, SparseVector, TrainedModel};

fn intent(tag: &str, patterns: &[&str], responses: &[&str]) -> Intent {
    Intent {
        tag: tag.to_string(),
        patterns: patterns.iter().map(|s| s.to_string()).collect(),
        responses: responses.iter().map(|s| s.to_string()).collect(),
    }
}

// Disjoint vocabularies per intent.
fn fixture_corpus() -> IntentCorpus {
    IntentCorpus::new(vec![
        intent("greeting", &["hi", "hello"], &["Hello there!"]),
        intent("goodbye", &["bye", "goodbye", "see you later"], &["Goodbye"]),
        intent(
            "weather",
            &["what is the weather", "is it raining today", "weather forecast"],
            &["It looks sunny.", "Bring an umbrella."],
        ),
        intent(
            "budget",
            &["how do I create a budget", "budget planning tips", "help me save money"],
            &["Track your expenses.", "Try the 50/30/20 rule."],
        ),
        intent("thanks", &["thanks", "thank you", "thanks a lot"], &["You're welcome!"]),
    ])
    .unwrap()
}

fn train(corpus: &IntentCorpus) -> TrainedModel {
    TrainedModel::fit(corpus, &EncoderConfig::default(), &ClassifierConfig::default()).unwrap()
}

#[test]
fn test_training_patterns_predict_their_own_tag() {
    let corpus = fixture_corpus();
    let model = train(&corpus);

    for pair in corpus.training_pairs() {
        let predicted = model.predict_tag(&pair.text).unwrap();
        assert_eq!(predicted, pair.tag, "pattern '{}' misclassified", pair.text);
    }
}

#[test]
fn test_unseen_phrasing_maps_to_nearest_intent() {
    let model = train(&fixture_corpus());
    assert_eq!(model.predict_tag("any rain in the forecast today?").unwrap(), "weather");
    assert_eq!(model.predict_tag("I need budget tips").unwrap(), "budget");
}

#[test]
fn test_out_of_distribution_input_still_returns_a_corpus_tag() {
    let corpus = fixture_corpus();
    let model = train(&corpus);

    for garbage in ["xqzv 8812 !!", "", "    ", "ñøπ∆ zzzzzz", "&&&"] {
        let tag = model.predict_tag(garbage).unwrap();
        assert!(corpus.contains(&tag), "'{}' produced unknown tag {}", garbage, tag);
    }
}

#[test]
fn test_training_is_reproducible() {
    let corpus = fixture_corpus();
    let a = train(&corpus);
    let b = train(&corpus);

    for text in ["hello", "weather forecast", "random words here", "thanks"] {
        let pa = a.classifier().predict_proba(&a.encode(text)).unwrap();
        let pb = b.classifier().predict_proba(&b.encode(text)).unwrap();
        assert_eq!(pa, pb, "same seed and data must give the same model");
    }
}

#[test]
fn test_probabilities_are_normalized_and_ranked() {
    let model = train(&fixture_corpus());
    let ranked = model.rank("hello").unwrap();

    let total: f64 = ranked.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(ranked[0].0, "greeting");
    assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_labels_match_corpus_tags() {
    let corpus = fixture_corpus();
    let model = train(&corpus);

    let labels = model.label_set();
    assert_eq!(labels.len(), corpus.len());
    assert!(labels.iter().all(|l| corpus.contains(l)));
}

#[test]
fn test_single_intent_corpus_is_constant() {
    let corpus = IntentCorpus::new(vec![intent("only", &["just this one"], &["ok"])]).unwrap();
    let model = train(&corpus);

    assert_eq!(model.predict_tag("just this one").unwrap(), "only");
    assert_eq!(model.predict_tag("something else").unwrap(), "only");
}

#[test]
fn test_fit_rejects_bad_training_sets() {
    let config = ClassifierConfig::default();

    let empty = LogisticRegression::fit(&[], &[], &config);
    assert!(matches!(empty, Err(ClassifierError::EmptyTrainingSet)));

    let features = vec![SparseVector::new(2, vec![(0, 1.0)])];
    let labels = vec!["a".to_string(), "b".to_string()];
    let mismatch = LogisticRegression::fit(&features, &labels, &config);
    assert!(matches!(
        mismatch,
        Err(ClassifierError::LengthMismatch { features: 1, labels: 2 })
    ));
}

#[test]
fn test_fit_rejects_indices_outside_the_vector_dimension() {
    let features = vec![
        SparseVector::new(2, vec![(5, 1.0)]),
        SparseVector::new(2, vec![(0, 1.0)]),
    ];
    let labels = vec!["a".to_string(), "b".to_string()];

    let result = LogisticRegression::fit(&features, &labels, &ClassifierConfig::default());
    assert!(matches!(
        result,
        Err(ClassifierError::IndexOutOfRange { row: 0, index: 5, dim: 2 })
    ));
}

#[test]
fn test_wrong_dimension_is_a_classify_error() {
    let model = train(&fixture_corpus());
    let dim = model.classifier().dimensions();

    let wrong = SparseVector::new(dim + 3, vec![(0, 1.0)]);
    let result = model.classifier().predict(&wrong);
    assert_eq!(
        result,
        Err(ClassifyError::DimensionMismatch { expected: dim, got: dim + 3 })
    );
}

use std::collections::BTreeSet;
use tracing::info;

use super::classifier::LogisticRegression;
use super::encoder::{SparseVector, TfIdfEncoder};
use crate::config::{ClassifierConfig, EncoderConfig};
use crate::error::{ClassifyError, EngineError};
use crate::intent::{IntentCorpus, Tag};

/// Anything that turns raw text into an intent tag.
///
/// Implementations must be pure with respect to individual predictions. [`TrainedModel`]
/// never returns [`ClassifyError::Encoder`]; that variant is for predictors whose
/// encoding step can fail.
pub trait IntentPredictor: Send + Sync {
    fn predict_tag(&self, text: &str) -> Result<Tag, ClassifyError>;
}

/// Fitted encoder + classifier pair. Only obtainable through [`TrainedModel::fit`], so a
/// model that has not been trained cannot be asked to predict.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    encoder: TfIdfEncoder,
    classifier: LogisticRegression,
}

impl TrainedModel {
    pub fn fit(
        corpus: &IntentCorpus,
        encoder_config: &EncoderConfig,
        classifier_config: &ClassifierConfig,
    ) -> Result<Self, EngineError> {
        let pairs = corpus.training_pairs();
        let texts: Vec<&str> = pairs.iter().map(|p| p.text.as_str()).collect();
        let labels: Vec<Tag> = pairs.iter().map(|p| p.tag.clone()).collect();

        let encoder = TfIdfEncoder::fit(&texts, encoder_config)?;
        let features: Vec<SparseVector> = texts.iter().map(|t| encoder.transform(t)).collect();
        let classifier = LogisticRegression::fit(&features, &labels, classifier_config)?;

        let model = Self { encoder, classifier };
        model.check_labels(corpus)?;

        info!(
            samples = pairs.len(),
            vocabulary = model.encoder.dimensions(),
            classes = model.classifier.classes().len(),
            "Model trained"
        );
        Ok(model)
    }

    /// Every label the classifier can emit must resolve to a corpus intent.
    fn check_labels(&self, corpus: &IntentCorpus) -> Result<(), EngineError> {
        let unknown: Vec<String> = self
            .labels()
            .filter(|l| !corpus.contains(l))
            .map(str::to_string)
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(EngineError::UnknownLabels(unknown))
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classifier.classes().iter().map(String::as_str)
    }

    pub fn label_set(&self) -> BTreeSet<&str> {
        self.labels().collect()
    }

    pub fn encoder(&self) -> &TfIdfEncoder {
        &self.encoder
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn encode(&self, text: &str) -> SparseVector {
        self.encoder.transform(text)
    }

    /// (tag, probability) pairs sorted by descending probability.
    pub fn rank(&self, text: &str) -> Result<Vec<(&str, f64)>, ClassifyError> {
        let proba = self.classifier.predict_proba(&self.encode(text))?;
        let mut ranked: Vec<(&str, f64)> = self.labels().zip(proba).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(ranked)
    }
}

impl IntentPredictor for TrainedModel {
    fn predict_tag(&self, text: &str) -> Result<Tag, ClassifyError> {
        let features = self.encode(text);
        self.classifier.predict(&features).map(str::to_string)
    }
}

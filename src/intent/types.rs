use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Tag = String;

/// One labeled category of user utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub tag: Tag,
    /// Example utterances used for training. Never empty.
    pub patterns: Vec<String>,
    /// Canned replies. Never empty.
    pub responses: Vec<String>,
}

/// A flattened (pattern, tag) example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPair {
    pub text: String,
    pub tag: Tag,
}

/// Validated, immutable intent table.
///
/// Construct through [`IntentCorpus::new`] or the loaders in `intent::loader`; both
/// enforce unique non-blank tags and non-empty pattern/response pools.
#[derive(Debug, Clone)]
pub struct IntentCorpus {
    intents: Vec<Intent>,
    index: HashMap<Tag, usize>,
}

impl IntentCorpus {
    pub(crate) fn from_validated(intents: Vec<Intent>) -> Self {
        let index = intents
            .iter()
            .enumerate()
            .map(|(i, intent)| (intent.tag.clone(), i))
            .collect();
        Self { intents, index }
    }

    pub fn get(&self, tag: &str) -> Option<&Intent> {
        self.index.get(tag).and_then(|&i| self.intents.get(i))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Tags in corpus order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.intents.iter().map(|i| i.tag.as_str())
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Every pattern paired with its tag, in corpus order.
    pub fn training_pairs(&self) -> Vec<TrainingPair> {
        self.intents
            .iter()
            .flat_map(|intent| {
                intent.patterns.iter().map(move |p| TrainingPair {
                    text: p.clone(),
                    tag: intent.tag.clone(),
                })
            })
            .collect()
    }
}

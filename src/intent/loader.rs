use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::types::{Intent, IntentCorpus};
use crate::error::CorpusError;

// Raw shape before validation; every field optional so malformed entries surface as
// typed errors rather than generic serde messages.
#[derive(Debug, Deserialize)]
struct RawIntent {
    tag: Option<String>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    responses: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Bare(Vec<RawIntent>),
    Wrapped { intents: Vec<RawIntent> },
}

impl IntentCorpus {
    /// Validates and indexes a list of intents.
    pub fn new(intents: Vec<Intent>) -> Result<Self, CorpusError> {
        if intents.is_empty() {
            return Err(CorpusError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, intent) in intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(CorpusError::MissingTag { index });
            }
            if intent.patterns.is_empty() {
                return Err(CorpusError::NoPatterns { tag: intent.tag.clone() });
            }
            if intent.responses.is_empty() {
                return Err(CorpusError::NoResponses { tag: intent.tag.clone() });
            }
            if !seen.insert(intent.tag.as_str()) {
                return Err(CorpusError::DuplicateTag(intent.tag.clone()));
            }
        }

        Ok(Self::from_validated(intents))
    }

    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let raw = match serde_json::from_str::<RawDocument>(json)? {
            RawDocument::Bare(list) => list,
            RawDocument::Wrapped { intents } => intents,
        };

        let mut intents = Vec::with_capacity(raw.len());
        for (index, entry) in raw.into_iter().enumerate() {
            let tag = entry.tag.ok_or(CorpusError::MissingTag { index })?;
            intents.push(Intent {
                tag,
                patterns: entry.patterns,
                responses: entry.responses,
            });
        }

        Self::new(intents)
    }

    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            intents = corpus.len(),
            patterns = corpus.training_pairs().len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }
}

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::ClassifyError;
use crate::intent::{IntentCorpus, Tag};
use crate::model::IntentPredictor;

/// Why a fallback reply was produced. Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallbackReason {
    Encoder,
    Classifier,
    MissingTag,
}

impl From<&ClassifyError> for FallbackReason {
    fn from(err: &ClassifyError) -> Self {
        match err {
            ClassifyError::Encoder(_) => FallbackReason::Encoder,
            ClassifyError::DimensionMismatch { .. } | ClassifyError::Classifier(_) => {
                FallbackReason::Classifier
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    Matched(Tag),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub outcome: ReplyOutcome,
    /// Set when the reply is a termination token. The caller decides what to do with it.
    pub ends_conversation: bool,
}

impl Reply {
    pub fn tag(&self) -> Option<&str> {
        match &self.outcome {
            ReplyOutcome::Matched(tag) => Some(tag.as_str()),
            ReplyOutcome::Fallback(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ReplyOutcome::Fallback(_))
    }
}

#[derive(Debug, Clone)]
pub struct ResponseSelector {
    fallback: String,
    termination_tokens: Vec<String>,
}

impl ResponseSelector {
    pub fn new(fallback: impl Into<String>, termination_tokens: &[String]) -> Self {
        Self {
            fallback: fallback.into(),
            termination_tokens: termination_tokens
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.fallback_response.clone(), &config.termination_tokens)
    }

    pub fn fallback_text(&self) -> &str {
        &self.fallback
    }

    /// Uniformly draws one response from `tag`'s pool, or the fallback if `tag` is unknown.
    pub fn select<R: Rng + ?Sized>(&self, tag: &str, corpus: &IntentCorpus, rng: &mut R) -> Reply {
        let chosen = corpus
            .get(tag)
            .and_then(|intent| intent.responses.choose(rng));

        match chosen {
            Some(text) => Reply {
                text: text.clone(),
                outcome: ReplyOutcome::Matched(tag.to_string()),
                ends_conversation: self.is_termination(text),
            },
            None => {
                warn!(tag = %tag, "Predicted tag has no corpus entry");
                self.fallback(FallbackReason::MissingTag)
            }
        }
    }

    /// Classifies `text` and selects a reply. Classification errors never escape; they
    /// become the fallback reply.
    pub fn respond<P, R>(&self, predictor: &P, text: &str, corpus: &IntentCorpus, rng: &mut R) -> Reply
    where
        P: IntentPredictor + ?Sized,
        R: Rng + ?Sized,
    {
        match predictor.predict_tag(text) {
            Ok(tag) => {
                debug!(tag = %tag, "Intent predicted");
                self.select(&tag, corpus, rng)
            }
            Err(e) => {
                let reason = FallbackReason::from(&e);
                warn!(?reason, error = %e, "Classification failed");
                self.fallback(reason)
            }
        }
    }

    pub fn is_termination(&self, response: &str) -> bool {
        let normalized = response.trim().to_lowercase();
        self.termination_tokens.iter().any(|t| *t == normalized)
    }

    fn fallback(&self, reason: FallbackReason) -> Reply {
        Reply {
            text: self.fallback.clone(),
            outcome: ReplyOutcome::Fallback(reason),
            ends_conversation: false,
        }
    }
}

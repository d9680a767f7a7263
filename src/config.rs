use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_FALLBACK: &str = "Sorry, I didn't quite understand that. Could you try again?";
pub const DEFAULT_FAREWELL: &str = "Thank you for chatting with me. Have a great day!";

/// Lower bound on classifier epochs. Small sparse corpora need the headroom to converge.
pub const MIN_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub corpus_path: PathBuf,
    pub chat_log_path: PathBuf,
    pub feedback_log_path: PathBuf,
    pub fallback_response: String,
    /// Replies equal to one of these (case-insensitive) end the conversation.
    pub termination_tokens: Vec<String>,
    pub farewell_message: String,
    /// Fixes response selection for reproducible sessions. Entropy-seeded when absent.
    pub response_seed: Option<u64>,
    pub encoder: EncoderConfig,
    pub classifier: ClassifierConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("intents.json"),
            chat_log_path: PathBuf::from("chat_log.csv"),
            feedback_log_path: PathBuf::from("feedback_log.csv"),
            fallback_response: DEFAULT_FALLBACK.to_string(),
            termination_tokens: vec!["goodbye".to_string(), "bye".to_string()],
            farewell_message: DEFAULT_FAREWELL.to_string(),
            response_seed: None,
            encoder: EncoderConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Longest n-gram in the vocabulary (2 = unigrams + bigrams).
    pub ngram_max: usize,
    pub min_df: usize,
    pub stop_words: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ngram_max: 2,
            min_df: 1,
            stop_words: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub seed: u64,
    /// Epoch cap. Values below [`MIN_ITERATIONS`] are rejected by `validate`.
    pub max_iter: usize,
    /// Inverse regularization strength.
    pub c: f64,
    pub tol: f64,
    pub learning_rate: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iter: MIN_ITERATIONS,
            c: 1.0,
            tol: 1e-6,
            learning_rate: 0.5,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_response.trim().is_empty() {
            return Err(invalid("fallback_response", "must not be blank"));
        }
        if self.encoder.ngram_max == 0 {
            return Err(invalid("encoder.ngram_max", "must be at least 1"));
        }
        if self.encoder.min_df == 0 {
            return Err(invalid("encoder.min_df", "must be at least 1"));
        }
        if self.classifier.max_iter < MIN_ITERATIONS {
            return Err(ConfigError::Invalid {
                field: "classifier.max_iter",
                reason: format!("must be at least {}", MIN_ITERATIONS),
            });
        }
        if !(self.classifier.c > 0.0) {
            return Err(invalid("classifier.c", "must be positive"));
        }
        if !(self.classifier.learning_rate > 0.0) {
            return Err(invalid("classifier.learning_rate", "must be positive"));
        }
        if !(self.classifier.tol >= 0.0) {
            return Err(invalid("classifier.tol", "must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

use std::path::PathBuf;

/// Failures while loading or validating the intents corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("cannot read corpus at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("corpus contains no intents")]
    Empty,

    #[error("intent #{index} has a missing or blank tag")]
    MissingTag { index: usize },

    #[error("intent '{tag}' has no patterns")]
    NoPatterns { tag: String },

    #[error("intent '{tag}' has no responses")]
    NoResponses { tag: String },

    #[error("duplicate intent tag '{0}'")]
    DuplicateTag(String),
}

/// Failures while fitting the feature encoder.
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("cannot fit encoder on an empty training set")]
    EmptyTrainingSet,

    #[error("empty vocabulary; training documents contain only stop words")]
    EmptyVocabulary,
}

/// Failures while fitting the intent classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("cannot fit classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("{features} feature vectors but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("feature vector #{row} has index {index} outside dimension {dim}")]
    IndexOutOfRange { row: usize, index: usize, dim: usize },
}

/// Serve-time failures inside the encode/predict pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("encoder failure: {0}")]
    Encoder(String),

    #[error("feature vector has dimension {got}, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("classifier failure: {0}")]
    Classifier(String),
}

/// Failures while creating, appending to, or reading an interaction log.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("log i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log format error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Invalid configuration values or unreadable configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Startup failures. Any of these means the engine must not serve requests.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error("classifier labels not present in corpus: {0:?}")]
    UnknownLabels(Vec<String>),
}

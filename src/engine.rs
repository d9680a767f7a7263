use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::intent::IntentCorpus;
use crate::model::{IntentPredictor, TrainedModel};
use crate::recorder::{CsvInteractionRecorder, InteractionSink};
use crate::responder::{Reply, ResponseSelector};
use crate::telemetry::{TelemetryEvent, TelemetryRecorder, TelemetrySnapshot};

/// Everything a turn needs, built once at startup and shared read-only.
///
/// No `ChatEngine` exists until the model has finished fitting, so requests cannot
/// reach the classifier mid-fit. Share it across request contexts with `Arc`.
pub struct ChatEngine {
    config: EngineConfig,
    corpus: IntentCorpus,
    predictor: Arc<dyn IntentPredictor>,
    selector: ResponseSelector,
    sink: Arc<dyn InteractionSink>,
    telemetry: Mutex<TelemetryRecorder>,
}

impl ChatEngine {
    /// Loads the corpus named in `config`, trains the model and opens both logs.
    pub fn bootstrap(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let corpus = IntentCorpus::load(&config.corpus_path)?;
        Self::from_corpus(config, corpus)
    }

    /// Same as [`bootstrap`](Self::bootstrap) with an already-loaded corpus.
    pub fn from_corpus(config: EngineConfig, corpus: IntentCorpus) -> Result<Self, EngineError> {
        config.validate()?;
        let model = TrainedModel::fit(&corpus, &config.encoder, &config.classifier)?;
        let recorder = CsvInteractionRecorder::open(&config.chat_log_path, &config.feedback_log_path)?;
        info!(
            chat_log = %config.chat_log_path.display(),
            feedback_log = %config.feedback_log_path.display(),
            "Interaction logs ready"
        );
        Ok(Self::from_parts(config, corpus, Arc::new(model), Arc::new(recorder)))
    }

    pub fn from_parts(
        config: EngineConfig,
        corpus: IntentCorpus,
        predictor: Arc<dyn IntentPredictor>,
        sink: Arc<dyn InteractionSink>,
    ) -> Self {
        let selector = ResponseSelector::from_config(&config);
        Self {
            config,
            corpus,
            predictor,
            selector,
            sink,
            telemetry: Mutex::new(TelemetryRecorder::new()),
        }
    }

    /// Classifies `text` and picks a reply. Never fails; errors become the fallback.
    pub fn respond<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Reply {
        self.selector
            .respond(self.predictor.as_ref(), text, &self.corpus, rng)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn corpus(&self) -> &IntentCorpus {
        &self.corpus
    }

    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    pub fn sink(&self) -> &dyn InteractionSink {
        self.sink.as_ref()
    }

    pub fn record_telemetry(&self, event: TelemetryEvent) {
        self.telemetry.lock().record(event);
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.lock().snapshot()
    }

    /// Buffered events for one session. Bounded like the rest of the buffer.
    pub fn session_telemetry(&self, session: uuid::Uuid) -> TelemetrySnapshot {
        self.telemetry.lock().session_snapshot(session)
    }
}

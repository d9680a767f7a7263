pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
pub mod model;
pub mod recorder;
pub mod responder;
pub mod session;
pub mod telemetry;
pub mod time;

// Re-export the types a driver needs for a conversation loop
pub use config::EngineConfig;
pub use engine::ChatEngine;
pub use error::EngineError;
pub use intent::{Intent, IntentCorpus};
pub use recorder::{CsvInteractionRecorder, Feedback, InteractionSink};
pub use responder::{Reply, ReplyOutcome};
pub use session::{Session, TurnOutcome};

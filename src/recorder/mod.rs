//! Durable, append-only interaction logs.
//!
//! Turns and feedback live in two separate CSV files. Feedback is a related record in
//! its own log, never an edit of the turn row it refers to.

pub mod log;
pub mod types;

pub use self::log::CsvLog;
pub use types::*;

use std::path::PathBuf;
use tracing::debug;

use crate::error::RecorderError;
use crate::time::Timestamp;

/// Append target for accepted turns and their feedback.
pub trait InteractionSink: Send + Sync {
    fn record_turn(&self, input: &str, response: &str, timestamp: &Timestamp) -> Result<(), RecorderError>;

    fn record_feedback(
        &self,
        input: &str,
        response: &str,
        timestamp: &Timestamp,
        feedback: Feedback,
    ) -> Result<(), RecorderError>;
}

/// CSV-backed recorder. Safe to share across threads; each log has its own writer lock.
#[derive(Debug)]
pub struct CsvInteractionRecorder {
    turns: CsvLog,
    feedback: CsvLog,
}

impl CsvInteractionRecorder {
    /// Opens both logs, writing headers to any that do not exist yet.
    pub fn open(turn_log: impl Into<PathBuf>, feedback_log: impl Into<PathBuf>) -> Result<Self, RecorderError> {
        let recorder = Self::unopened(turn_log, feedback_log);
        recorder.turns.ensure_header()?;
        recorder.feedback.ensure_header()?;
        Ok(recorder)
    }

    /// Builds the recorder without touching the filesystem. Headers are still written
    /// lazily on first append.
    pub fn unopened(turn_log: impl Into<PathBuf>, feedback_log: impl Into<PathBuf>) -> Self {
        Self {
            turns: CsvLog::new(turn_log.into(), TURN_HEADER),
            feedback: CsvLog::new(feedback_log.into(), FEEDBACK_HEADER),
        }
    }

    pub fn log(&self, kind: LogKind) -> &CsvLog {
        match kind {
            LogKind::Turns => &self.turns,
            LogKind::Feedback => &self.feedback,
        }
    }

    pub fn read_turns(&self) -> Result<Vec<TurnRecord>, RecorderError> {
        self.turns.read_all()
    }

    pub fn read_feedback(&self) -> Result<Vec<FeedbackRecord>, RecorderError> {
        self.feedback.read_all()
    }
}

impl InteractionSink for CsvInteractionRecorder {
    fn record_turn(&self, input: &str, response: &str, timestamp: &Timestamp) -> Result<(), RecorderError> {
        self.turns.append(&[input, response, timestamp.as_str()])?;
        debug!(path = %self.turns.path().display(), "Turn recorded");
        Ok(())
    }

    fn record_feedback(
        &self,
        input: &str,
        response: &str,
        timestamp: &Timestamp,
        feedback: Feedback,
    ) -> Result<(), RecorderError> {
        self.feedback
            .append(&[input, response, timestamp.as_str(), feedback.as_str(), ""])?;
        debug!(path = %self.feedback.path().display(), %feedback, "Feedback recorded");
        Ok(())
    }
}

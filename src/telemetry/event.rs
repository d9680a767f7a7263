use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recorder::{Feedback, LogKind};
use crate::responder::FallbackReason;
use crate::time::Turn;

// Allowed: IDs, turn numbers, counts, enums
// Forbidden: user input text, response text

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TurnClassified {
        session: Uuid,
        turn: Turn,
    },

    Fallback {
        session: Uuid,
        turn: Turn,
        reason: FallbackReason,
    },

    FeedbackRecorded {
        session: Uuid,
        feedback: Feedback,
    },

    LogWriteFailed {
        session: Uuid,
        log: LogKind,
    },

    ConversationEnded {
        session: Uuid,
        turn: Turn,
    },

    SessionSummary {
        session: Uuid,
        turns: u64,
        fallbacks: u64,
        feedback_records: u64,
        log_failures: u64,
    },
}

use std::collections::VecDeque;
use uuid::Uuid;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(self.buffer.iter())
    }

    /// Snapshot restricted to one session's events still in the buffer. Older events of a
    /// long-lived session may already have been evicted.
    pub fn session_snapshot(&self, session: Uuid) -> TelemetrySnapshot {
        compute_snapshot(self.buffer.iter().filter(|e| e.session() == session))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl TelemetryEvent {
    pub fn session(&self) -> Uuid {
        match self {
            TelemetryEvent::TurnClassified { session, .. }
            | TelemetryEvent::Fallback { session, .. }
            | TelemetryEvent::FeedbackRecorded { session, .. }
            | TelemetryEvent::LogWriteFailed { session, .. }
            | TelemetryEvent::ConversationEnded { session, .. }
            | TelemetryEvent::SessionSummary { session, .. } => *session,
        }
    }
}

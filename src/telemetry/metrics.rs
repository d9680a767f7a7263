use super::event::TelemetryEvent;
use crate::recorder::{Feedback, LogKind};
use crate::responder::FallbackReason;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub turn_stats: TurnStats,
    pub feedback_stats: FeedbackStats,
    pub log_stats: LogStats,
    pub sessions_ended: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnStats {
    pub classified: u64,
    pub fallbacks: u64,
    pub encoder_failures: u64,
    pub classifier_failures: u64,
    pub missing_tags: u64,
    pub conversations_ended: u64,
    pub fallback_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackStats {
    pub good: u64,
    pub neutral: u64,
    pub bad: u64,
}

impl FeedbackStats {
    pub fn total(&self) -> u64 {
        self.good + self.neutral + self.bad
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogStats {
    pub turn_log_failures: u64,
    pub feedback_log_failures: u64,
}

impl LogStats {
    pub fn total(&self) -> u64 {
        self.turn_log_failures + self.feedback_log_failures
    }
}

pub fn compute_snapshot<'a>(events: impl Iterator<Item = &'a TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::TurnClassified { .. } => snap.turn_stats.classified += 1,
            TelemetryEvent::Fallback { reason, .. } => {
                snap.turn_stats.fallbacks += 1;
                match reason {
                    FallbackReason::Encoder => snap.turn_stats.encoder_failures += 1,
                    FallbackReason::Classifier => snap.turn_stats.classifier_failures += 1,
                    FallbackReason::MissingTag => snap.turn_stats.missing_tags += 1,
                }
            }
            TelemetryEvent::FeedbackRecorded { feedback, .. } => match feedback {
                Feedback::Good => snap.feedback_stats.good += 1,
                Feedback::Neutral => snap.feedback_stats.neutral += 1,
                Feedback::Bad => snap.feedback_stats.bad += 1,
            },
            TelemetryEvent::LogWriteFailed { log, .. } => match log {
                LogKind::Turns => snap.log_stats.turn_log_failures += 1,
                LogKind::Feedback => snap.log_stats.feedback_log_failures += 1,
            },
            TelemetryEvent::ConversationEnded { .. } => snap.turn_stats.conversations_ended += 1,
            TelemetryEvent::SessionSummary { .. } => snap.sessions_ended += 1,
        }
    }

    let total = snap.turn_stats.classified + snap.turn_stats.fallbacks;
    if total > 0 {
        snap.turn_stats.fallback_ratio = snap.turn_stats.fallbacks as f64 / total as f64;
    }

    snap
}

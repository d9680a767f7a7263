use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::ChatEngine;
use crate::recorder::{Feedback, LogKind};
use crate::responder::{Reply, ReplyOutcome};
use crate::telemetry::TelemetryEvent;
use crate::time::{Timestamp, Turn};

/// Result of one accepted turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub turn: Turn,
    pub input: String,
    pub reply: Reply,
    pub timestamp: Timestamp,
    /// False when the turn log could not be written. The reply is still valid.
    pub logged: bool,
}

/// Counts behind the summary emitted by [`Session::finish`].
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    fallbacks: u64,
    feedback_records: u64,
    log_failures: u64,
}

/// One user's conversation. Owns its turn counter and random source; shares the engine.
pub struct Session<R = ChaCha8Rng> {
    id: Uuid,
    engine: Arc<ChatEngine>,
    turn: Turn,
    rng: R,
    ended: bool,
    tally: Tally,
}

impl Session<ChaCha8Rng> {
    /// Seeds response selection from `response_seed` when configured, otherwise from entropy.
    pub fn new(engine: Arc<ChatEngine>) -> Self {
        let rng = match engine.config().response_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(engine, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(engine: Arc<ChatEngine>, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine,
            turn: Turn::default(),
            rng,
            ended: false,
            tally: Tally::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of accepted turns so far.
    pub fn turns(&self) -> Turn {
        self.turn
    }

    /// True once a reply has signaled the end of the conversation.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Classifies `input`, selects a reply and appends the turn to the turn log.
    ///
    /// Blank input is not a turn: nothing is classified or recorded and `None` is returned.
    pub fn turn(&mut self, input: &str) -> Option<TurnOutcome> {
        if input.trim().is_empty() {
            return None;
        }

        self.turn = self.turn.next();
        let reply = self.engine.respond(input, &mut self.rng);
        let timestamp = Timestamp::now();

        let event = match &reply.outcome {
            ReplyOutcome::Matched(_) => TelemetryEvent::TurnClassified {
                session: self.id,
                turn: self.turn,
            },
            ReplyOutcome::Fallback(reason) => {
                self.tally.fallbacks += 1;
                TelemetryEvent::Fallback {
                    session: self.id,
                    turn: self.turn,
                    reason: *reason,
                }
            }
        };
        self.engine.record_telemetry(event);
        debug!(session = %self.id, turn = self.turn.0, tag = ?reply.tag(), "Turn answered");

        let logged = match self.engine.sink().record_turn(input, &reply.text, &timestamp) {
            Ok(()) => true,
            Err(e) => {
                warn!(session = %self.id, turn = self.turn.0, error = %e, "Turn log write failed");
                self.tally.log_failures += 1;
                self.engine.record_telemetry(TelemetryEvent::LogWriteFailed {
                    session: self.id,
                    log: LogKind::Turns,
                });
                false
            }
        };

        if reply.ends_conversation {
            self.ended = true;
            self.engine.record_telemetry(TelemetryEvent::ConversationEnded {
                session: self.id,
                turn: self.turn,
            });
        }

        Some(TurnOutcome {
            turn: self.turn,
            input: input.to_string(),
            reply,
            timestamp,
            logged,
        })
    }

    /// Appends feedback for an earlier turn to the feedback log. Returns false if the
    /// write failed; the failure is logged and never interrupts the conversation.
    pub fn feedback(&mut self, outcome: &TurnOutcome, feedback: Feedback) -> bool {
        let result = self.engine.sink().record_feedback(
            &outcome.input,
            &outcome.reply.text,
            &outcome.timestamp,
            feedback,
        );

        match result {
            Ok(()) => {
                self.tally.feedback_records += 1;
                self.engine.record_telemetry(TelemetryEvent::FeedbackRecorded {
                    session: self.id,
                    feedback,
                });
                true
            }
            Err(e) => {
                warn!(session = %self.id, turn = outcome.turn.0, error = %e, "Feedback log write failed");
                self.tally.log_failures += 1;
                self.engine.record_telemetry(TelemetryEvent::LogWriteFailed {
                    session: self.id,
                    log: LogKind::Feedback,
                });
                false
            }
        }
    }

    /// Ends the session and returns its telemetry summary.
    pub fn finish(self) -> TelemetryEvent {
        let summary = TelemetryEvent::SessionSummary {
            session: self.id,
            turns: self.turn.0,
            fallbacks: self.tally.fallbacks,
            feedback_records: self.tally.feedback_records,
            log_failures: self.tally.log_failures,
        };
        info!(session = %self.id, summary = ?summary, "Session finished");
        self.engine.record_telemetry(summary.clone());
        summary
    }
}
